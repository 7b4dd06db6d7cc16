//! Company tail number repository.

use async_trait::async_trait;
use domain::models::{CompanyTail, NewCompanyTail};
use domain::stores::{CompanyTailStore, StoreResult};
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CompanyTailEntity;
use crate::error::store_error;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct CompanyTailRepository {
    pool: PgPool,
}

impl CompanyTailRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyTailStore for CompanyTailRepository {
    async fn list_company_tails(&self, company_id: Uuid) -> StoreResult<Vec<CompanyTail>> {
        let timer = QueryTimer::new("list_company_tails");
        let result = sqlx::query_as::<_, CompanyTailEntity>(
            r#"
            SELECT id, company_id, tail_number, created_at
            FROM company_tails
            WHERE company_id = $1
            ORDER BY tail_number ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result
            .map_err(store_error)?
            .into_iter()
            .map(CompanyTail::from)
            .collect())
    }

    async fn insert_company_tail(
        &self,
        id: Uuid,
        company_id: Uuid,
        input: &NewCompanyTail,
    ) -> StoreResult<CompanyTail> {
        let timer = QueryTimer::new("insert_company_tail");

        let inserted = sqlx::query(
            r#"
            INSERT INTO company_tails (id, company_id, tail_number)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.tail_number)
        .execute(&self.pool)
        .await;

        let result = match inserted {
            Ok(_) => {
                sqlx::query_as::<_, CompanyTailEntity>(
                    "SELECT id, company_id, tail_number, created_at FROM company_tails WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await
            }
            Err(e) => Err(e),
        };
        timer.record();

        result
            .map_err(store_error)?
            .map(CompanyTail::from)
            .ok_or_else(|| StoreError::not_found(format!("company tail {}", id)))
    }

    async fn delete_company_tail(&self, id: Uuid) -> StoreResult<()> {
        let timer = QueryTimer::new("delete_company_tail");
        let result = sqlx::query("DELETE FROM company_tails WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();

        result.map_err(store_error)?;
        Ok(())
    }
}
