//! Audit log domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use uuid::Uuid;

/// Audited flight actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
        }
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(AuditAction::Create),
            "update" => Ok(AuditAction::Update),
            _ => Err(format!("Unknown audit action: {}", s)),
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Change payload stored with each entry.
///
/// `previous` is the flight snapshot before an update; `new` is the created
/// flight or the submitted changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<JsonValue>,
    pub new: JsonValue,
}

/// A recorded change to a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub user_id: Uuid,
    pub action: AuditAction,
    pub changes: AuditChanges,
    pub created_at: DateTime<Utc>,
}

/// Input for inserting an audit entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditLog {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub user_id: Uuid,
    pub action: AuditAction,
    pub changes: AuditChanges,
}
