//! Flight task (checklist item) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A checklist item attached to a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightTask {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub description: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl FlightTask {
    pub fn with_changes(&self, changes: &FlightTaskChanges) -> FlightTask {
        let mut updated = self.clone();
        if let Some(ref description) = changes.description {
            updated.description = description.trim().to_string();
        }
        if let Some(completed) = changes.completed {
            updated.completed = completed;
        }
        if changes.due_date.is_some() {
            updated.due_date = changes.due_date;
        }
        updated
    }
}

/// Request payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFlightTask {
    #[serde(default)]
    pub id: Option<Uuid>,

    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub description: String,

    pub due_date: Option<DateTime<Utc>>,
}

/// Request payload for updating a task. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FlightTaskChanges {
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub description: Option<String>,

    pub completed: Option<bool>,

    pub due_date: Option<DateTime<Utc>>,
}

impl FlightTaskChanges {
    /// Changes that flip the completion flag of `task`.
    pub fn toggle(task: &FlightTask) -> Self {
        Self {
            completed: Some(!task.completed),
            ..Default::default()
        }
    }
}
