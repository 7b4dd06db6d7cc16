//! Company tail number entity.

use chrono::{DateTime, Utc};
use domain::models::CompanyTail;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct CompanyTailEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub tail_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<CompanyTailEntity> for CompanyTail {
    fn from(entity: CompanyTailEntity) -> Self {
        CompanyTail {
            id: entity.id,
            company_id: entity.company_id,
            tail_number: entity.tail_number,
            created_at: entity.created_at,
        }
    }
}
