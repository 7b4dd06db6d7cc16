//! Audit log entity.

use chrono::{DateTime, Utc};
use domain::models::{AuditAction, AuditChanges, AuditLog};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for flight audit logs.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub user_id: Uuid,
    /// `create` or `update`.
    pub action: String,
    /// `{"previous": ..., "new": ...}` document.
    pub changes: JsonValue,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntity {
    /// Convert to domain model.
    ///
    /// A changes document that does not have the expected shape is kept
    /// whole under `new` rather than dropped.
    pub fn into_domain(self) -> AuditLog {
        let action = self
            .action
            .parse::<AuditAction>()
            .unwrap_or(AuditAction::Update);

        let changes = serde_json::from_value::<AuditChanges>(self.changes.clone()).unwrap_or(
            AuditChanges {
                previous: None,
                new: self.changes,
            },
        );

        AuditLog {
            id: self.id,
            flight_id: self.flight_id,
            user_id: self.user_id,
            action,
            changes,
            created_at: self.created_at,
        }
    }
}

impl From<AuditLogEntity> for AuditLog {
    fn from(entity: AuditLogEntity) -> Self {
        entity.into_domain()
    }
}
