//! Audit entry construction for flight changes.

use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::{AuditAction, AuditChanges, Flight, FlightChanges, NewAuditLog};

/// Builder for audit log entries with a fluent API.
#[derive(Debug, Clone)]
pub struct AuditLogBuilder {
    id: Uuid,
    flight_id: Uuid,
    user_id: Uuid,
    action: AuditAction,
    previous: Option<JsonValue>,
    new: JsonValue,
}

impl AuditLogBuilder {
    /// Create a builder for an action by `user_id` on `flight_id`.
    pub fn new(flight_id: Uuid, user_id: Uuid, action: AuditAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            flight_id,
            user_id,
            action,
            previous: None,
            new: JsonValue::Null,
        }
    }

    /// Entry for a newly created flight: `{new: <flight>}`.
    pub fn flight_created(user_id: Uuid, flight: &Flight) -> Self {
        Self::new(flight.id, user_id, AuditAction::Create).with_new(flight)
    }

    /// Entry for an update: `{previous: <snapshot>, new: <submitted changes>}`.
    pub fn flight_updated(user_id: Uuid, previous: &Flight, submitted: &FlightChanges) -> Self {
        Self::new(previous.id, user_id, AuditAction::Update)
            .with_previous(previous)
            .with_new(submitted)
    }

    /// Fix the entry id, so a retried insert targets the same row.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_previous<T: Serialize>(mut self, previous: &T) -> Self {
        self.previous = Some(to_json(previous));
        self
    }

    pub fn with_new<T: Serialize>(mut self, new: &T) -> Self {
        self.new = to_json(new);
        self
    }

    pub fn build(self) -> NewAuditLog {
        NewAuditLog {
            id: self.id,
            flight_id: self.flight_id,
            user_id: self.user_id,
            action: self.action,
            changes: AuditChanges {
                previous: self.previous,
                new: self.new,
            },
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}
