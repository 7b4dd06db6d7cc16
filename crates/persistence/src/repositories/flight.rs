//! Flight repository for database operations.

use async_trait::async_trait;
use domain::models::{Flight, FlightChanges, FlightQuery, NewFlight};
use domain::stores::{FlightStore, StoreResult};
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::FlightEntity;
use crate::error::store_error;
use crate::metrics::QueryTimer;

/// Columns selected for a flight, with the company name from the join.
const FLIGHT_COLUMNS: &str = r#"
    f.id, f.tail_number, f.start_time, f.end_time, f.start_airport, f.end_airport,
    f.notes, f.company_id, c.name AS company_name, f.status, f.created_by,
    f.created_at, f.updated_at
"#;

/// Repository for flight database operations.
#[derive(Clone)]
pub struct FlightRepository {
    pool: PgPool,
}

impl FlightRepository {
    /// Creates a new FlightRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<FlightEntity>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM flights f LEFT JOIN companies c ON c.id = f.company_id WHERE f.id = $1",
            FLIGHT_COLUMNS
        );
        sqlx::query_as::<_, FlightEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait]
impl FlightStore for FlightRepository {
    async fn list_flights(&self, query: &FlightQuery) -> StoreResult<Vec<Flight>> {
        let timer = QueryTimer::new("list_flights");

        let sql = format!(
            r#"
            SELECT {}
            FROM flights f
            LEFT JOIN companies c ON c.id = f.company_id
            WHERE ($1::uuid IS NULL OR f.company_id = $1)
              AND ($2::text IS NULL OR f.tail_number = UPPER(TRIM($2)))
              AND ($3::text IS NULL OR f.status = $3)
            ORDER BY {}
            "#,
            FLIGHT_COLUMNS,
            query.sort.order_by()
        );

        let result = sqlx::query_as::<_, FlightEntity>(&sql)
            .bind(query.company_id)
            .bind(query.tail_number.as_deref())
            .bind(query.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await;

        timer.record();
        Ok(result
            .map_err(store_error)?
            .into_iter()
            .map(Flight::from)
            .collect())
    }

    async fn find_flight(&self, id: Uuid) -> StoreResult<Option<Flight>> {
        let timer = QueryTimer::new("find_flight");
        let result = self.fetch(id).await;
        timer.record();
        Ok(result.map_err(store_error)?.map(Flight::from))
    }

    async fn insert_flight(
        &self,
        id: Uuid,
        created_by: Uuid,
        input: &NewFlight,
    ) -> StoreResult<Flight> {
        let timer = QueryTimer::new("insert_flight");

        // A replayed create hits the primary key and keeps the first row; the
        // re-read below rejects a different flight reusing the same id.
        let inserted = sqlx::query(
            r#"
            INSERT INTO flights (
                id, tail_number, start_time, end_time, start_airport, end_airport,
                notes, company_id, status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'active', $9)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&input.tail_number)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(&input.start_airport)
        .bind(&input.end_airport)
        .bind(input.notes.as_deref())
        .bind(input.company_id)
        .bind(created_by)
        .execute(&self.pool)
        .await;

        let result = match inserted {
            Ok(_) => self.fetch(id).await,
            Err(e) => Err(e),
        };
        timer.record();

        let flight = result
            .map_err(store_error)?
            .map(Flight::from)
            .ok_or_else(|| StoreError::not_found(format!("flight {}", id)))?;

        if !flight.matches_submission(created_by, input) {
            return Err(StoreError::duplicate("flights_pkey"));
        }
        Ok(flight)
    }

    async fn update_flight(&self, id: Uuid, changes: &FlightChanges) -> StoreResult<Flight> {
        let timer = QueryTimer::new("update_flight");

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE flights
            SET tail_number = COALESCE($2, tail_number),
                start_time = COALESCE($3, start_time),
                end_time = COALESCE($4, end_time),
                start_airport = COALESCE($5, start_airport),
                end_airport = COALESCE($6, end_airport),
                notes = CASE WHEN $7 THEN NULLIF($8, '') ELSE notes END,
                company_id = COALESCE($9, company_id),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.tail_number.as_deref())
        .bind(changes.start_time)
        .bind(changes.end_time)
        .bind(changes.start_airport.as_deref())
        .bind(changes.end_airport.as_deref())
        .bind(changes.notes.is_some())
        .bind(changes.notes.as_deref())
        .bind(changes.company_id)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await;

        let result = match updated {
            Ok(Some(_)) => self.fetch(id).await,
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        timer.record();

        result
            .map_err(store_error)?
            .map(Flight::from)
            .ok_or_else(|| StoreError::not_found(format!("flight {}", id)))
    }

    async fn delete_flight(&self, id: Uuid) -> StoreResult<()> {
        let timer = QueryTimer::new("delete_flight");
        let result = sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();

        result.map_err(store_error)?;
        Ok(())
    }
}
