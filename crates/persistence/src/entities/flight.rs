//! Flight entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Flight, FlightStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the flights table joined with the owning company's name.
#[derive(Debug, Clone, FromRow)]
pub struct FlightEntity {
    pub id: Uuid,
    pub tail_number: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_airport: String,
    pub end_airport: String,
    pub notes: Option<String>,
    pub company_id: Option<Uuid>,
    pub company_name: Option<String>,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FlightEntity {
    /// Convert to domain model.
    pub fn into_domain(self) -> Flight {
        let status = self
            .status
            .parse::<FlightStatus>()
            .unwrap_or(FlightStatus::Active);

        Flight {
            id: self.id,
            tail_number: self.tail_number,
            start_time: self.start_time,
            end_time: self.end_time,
            start_airport: self.start_airport,
            end_airport: self.end_airport,
            notes: self.notes,
            company_id: self.company_id,
            company_name: self.company_name,
            status,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<FlightEntity> for Flight {
    fn from(entity: FlightEntity) -> Self {
        entity.into_domain()
    }
}
