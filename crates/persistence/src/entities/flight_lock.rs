//! Flight lock entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::FlightLock;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct FlightLockEntity {
    pub flight_id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub locked_at: DateTime<Utc>,
}

impl From<FlightLockEntity> for FlightLock {
    fn from(entity: FlightLockEntity) -> Self {
        FlightLock {
            flight_id: entity.flight_id,
            user_id: entity.user_id,
            user_email: entity.user_email,
            locked_at: entity.locked_at,
        }
    }
}
