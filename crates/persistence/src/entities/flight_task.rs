//! Flight task entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::FlightTask;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct FlightTaskEntity {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub description: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<FlightTaskEntity> for FlightTask {
    fn from(entity: FlightTaskEntity) -> Self {
        FlightTask {
            id: entity.id,
            flight_id: entity.flight_id,
            description: entity.description,
            completed: entity.completed,
            due_date: entity.due_date,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }
}
