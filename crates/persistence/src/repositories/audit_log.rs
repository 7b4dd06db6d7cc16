//! Audit log repository.

use async_trait::async_trait;
use domain::models::{AuditLog, NewAuditLog};
use domain::stores::{AuditLogStore, StoreResult};
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AuditLogEntity;
use crate::error::store_error;
use crate::metrics::QueryTimer;

/// Repository for flight audit log entries. Entries are append-only.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogStore for AuditLogRepository {
    async fn list_audit_logs(&self, flight_id: Uuid) -> StoreResult<Vec<AuditLog>> {
        let timer = QueryTimer::new("list_audit_logs");
        let result = sqlx::query_as::<_, AuditLogEntity>(
            r#"
            SELECT id, flight_id, user_id, action, changes, created_at
            FROM audit_logs
            WHERE flight_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result
            .map_err(store_error)?
            .into_iter()
            .map(AuditLog::from)
            .collect())
    }

    async fn insert_audit_log(&self, input: &NewAuditLog) -> StoreResult<AuditLog> {
        let timer = QueryTimer::new("insert_audit_log");

        let changes = serde_json::to_value(&input.changes)
            .map_err(|e| StoreError::Validation(format!("invalid audit changes: {}", e)))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO audit_logs (id, flight_id, user_id, action, changes)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(input.id)
        .bind(input.flight_id)
        .bind(input.user_id)
        .bind(input.action.as_str())
        .bind(changes)
        .execute(&self.pool)
        .await;

        let result = match inserted {
            Ok(_) => {
                sqlx::query_as::<_, AuditLogEntity>(
                    "SELECT id, flight_id, user_id, action, changes, created_at FROM audit_logs WHERE id = $1",
                )
                .bind(input.id)
                .fetch_optional(&self.pool)
                .await
            }
            Err(e) => Err(e),
        };
        timer.record();

        result
            .map_err(store_error)?
            .map(AuditLog::from)
            .ok_or_else(|| StoreError::not_found(format!("audit log {}", input.id)))
    }
}
