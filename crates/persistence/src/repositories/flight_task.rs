//! Flight task repository for database operations.

use async_trait::async_trait;
use domain::models::{FlightTask, FlightTaskChanges, NewFlightTask};
use domain::stores::{FlightTaskStore, StoreResult};
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::FlightTaskEntity;
use crate::error::store_error;
use crate::metrics::QueryTimer;

/// Repository for flight task database operations.
#[derive(Clone)]
pub struct FlightTaskRepository {
    pool: PgPool,
}

impl FlightTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<FlightTaskEntity>, sqlx::Error> {
        sqlx::query_as::<_, FlightTaskEntity>(
            r#"
            SELECT id, flight_id, description, completed, due_date, created_by, created_at
            FROM flight_tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl FlightTaskStore for FlightTaskRepository {
    async fn list_flight_tasks(&self, flight_id: Uuid) -> StoreResult<Vec<FlightTask>> {
        let timer = QueryTimer::new("list_flight_tasks");
        let result = sqlx::query_as::<_, FlightTaskEntity>(
            r#"
            SELECT id, flight_id, description, completed, due_date, created_by, created_at
            FROM flight_tasks
            WHERE flight_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result
            .map_err(store_error)?
            .into_iter()
            .map(FlightTask::from)
            .collect())
    }

    async fn find_flight_task(&self, id: Uuid) -> StoreResult<Option<FlightTask>> {
        let timer = QueryTimer::new("find_flight_task");
        let result = self.fetch(id).await;
        timer.record();
        Ok(result.map_err(store_error)?.map(FlightTask::from))
    }

    async fn insert_flight_task(
        &self,
        id: Uuid,
        flight_id: Uuid,
        created_by: Uuid,
        input: &NewFlightTask,
    ) -> StoreResult<FlightTask> {
        let timer = QueryTimer::new("insert_flight_task");

        let inserted = sqlx::query(
            r#"
            INSERT INTO flight_tasks (id, flight_id, description, completed, due_date, created_by)
            VALUES ($1, $2, TRIM($3), FALSE, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(flight_id)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(created_by)
        .execute(&self.pool)
        .await;

        let result = match inserted {
            Ok(_) => self.fetch(id).await,
            Err(e) => Err(e),
        };
        timer.record();

        result
            .map_err(store_error)?
            .map(FlightTask::from)
            .ok_or_else(|| StoreError::not_found(format!("flight task {}", id)))
    }

    async fn update_flight_task(
        &self,
        id: Uuid,
        changes: &FlightTaskChanges,
    ) -> StoreResult<FlightTask> {
        let timer = QueryTimer::new("update_flight_task");
        let result = sqlx::query_as::<_, FlightTaskEntity>(
            r#"
            UPDATE flight_tasks
            SET description = COALESCE(TRIM($2), description),
                completed = COALESCE($3, completed),
                due_date = COALESCE($4, due_date)
            WHERE id = $1
            RETURNING id, flight_id, description, completed, due_date, created_by, created_at
            "#,
        )
        .bind(id)
        .bind(changes.description.as_deref())
        .bind(changes.completed)
        .bind(changes.due_date)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result
            .map_err(store_error)?
            .map(FlightTask::from)
            .ok_or_else(|| StoreError::not_found(format!("flight task {}", id)))
    }

    async fn delete_flight_task(&self, id: Uuid) -> StoreResult<()> {
        let timer = QueryTimer::new("delete_flight_task");
        let result = sqlx::query("DELETE FROM flight_tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();

        result.map_err(store_error)?;
        Ok(())
    }
}
