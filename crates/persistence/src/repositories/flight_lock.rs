//! Flight lock repository.
//!
//! Acquisition is a single conditional upsert so two editors racing for the
//! same flight cannot both win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::models::FlightLock;
use domain::stores::{FlightLockStore, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::FlightLockEntity;
use crate::error::store_error;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct FlightLockRepository {
    pool: PgPool,
}

impl FlightLockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FlightLockStore for FlightLockRepository {
    async fn list_flight_locks(&self) -> StoreResult<Vec<FlightLock>> {
        let timer = QueryTimer::new("list_flight_locks");
        let result = sqlx::query_as::<_, FlightLockEntity>(
            r#"
            SELECT flight_id, user_id, user_email, locked_at
            FROM flight_locks
            ORDER BY locked_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result
            .map_err(store_error)?
            .into_iter()
            .map(FlightLock::from)
            .collect())
    }

    async fn find_flight_lock(&self, flight_id: Uuid) -> StoreResult<Option<FlightLock>> {
        let timer = QueryTimer::new("find_flight_lock");
        let result = sqlx::query_as::<_, FlightLockEntity>(
            "SELECT flight_id, user_id, user_email, locked_at FROM flight_locks WHERE flight_id = $1",
        )
        .bind(flight_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result.map_err(store_error)?.map(FlightLock::from))
    }

    async fn try_acquire_flight_lock(
        &self,
        lock: &FlightLock,
        stale_before: DateTime<Utc>,
    ) -> StoreResult<Option<FlightLock>> {
        let timer = QueryTimer::new("try_acquire_flight_lock");

        // Overwrites only our own lock or an expired one.
        let result = sqlx::query_as::<_, FlightLockEntity>(
            r#"
            INSERT INTO flight_locks (flight_id, user_id, user_email, locked_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (flight_id) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                user_email = EXCLUDED.user_email,
                locked_at = EXCLUDED.locked_at
            WHERE flight_locks.user_id = EXCLUDED.user_id
               OR flight_locks.locked_at <= $5
            RETURNING flight_id, user_id, user_email, locked_at
            "#,
        )
        .bind(lock.flight_id)
        .bind(lock.user_id)
        .bind(&lock.user_email)
        .bind(lock.locked_at)
        .bind(stale_before)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        let acquired = result.map_err(store_error)?.map(FlightLock::from);
        if acquired.is_none() {
            tracing::debug!(
                flight_id = %lock.flight_id,
                user_id = %lock.user_id,
                "Flight lock held by another user"
            );
        }
        Ok(acquired)
    }

    async fn release_flight_lock(&self, flight_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let timer = QueryTimer::new("release_flight_lock");
        let result = sqlx::query("DELETE FROM flight_locks WHERE flight_id = $1 AND user_id = $2")
            .bind(flight_id)
            .bind(user_id)
            .execute(&self.pool)
            .await;
        timer.record();

        Ok(result.map_err(store_error)?.rows_affected() > 0)
    }

    async fn delete_expired_flight_locks(&self, stale_before: DateTime<Utc>) -> StoreResult<u64> {
        let timer = QueryTimer::new("delete_expired_flight_locks");
        let result = sqlx::query("DELETE FROM flight_locks WHERE locked_at <= $1")
            .bind(stale_before)
            .execute(&self.pool)
            .await;
        timer.record();

        let removed = result.map_err(store_error)?.rows_affected();
        if removed > 0 {
            tracing::debug!(removed, "Deleted expired flight locks");
        }
        Ok(removed)
    }
}
