//! Company repository for database operations.

use async_trait::async_trait;
use domain::models::{Company, CompanyChanges, NewCompany};
use domain::stores::{CompanyStore, StoreResult};
use domain::StoreError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CompanyEntity;
use crate::error::store_error;
use crate::metrics::QueryTimer;

/// Repository for company database operations.
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<CompanyEntity>, sqlx::Error> {
        sqlx::query_as::<_, CompanyEntity>(
            r#"
            SELECT id, name, contact_name, contact_email, contact_phone,
                   created_by, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn list_companies(&self) -> StoreResult<Vec<Company>> {
        let timer = QueryTimer::new("list_companies");
        let result = sqlx::query_as::<_, CompanyEntity>(
            r#"
            SELECT id, name, contact_name, contact_email, contact_phone,
                   created_by, created_at, updated_at
            FROM companies
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result
            .map_err(store_error)?
            .into_iter()
            .map(Company::from)
            .collect())
    }

    async fn find_company(&self, id: Uuid) -> StoreResult<Option<Company>> {
        let timer = QueryTimer::new("find_company");
        let result = self.fetch(id).await;
        timer.record();
        Ok(result.map_err(store_error)?.map(Company::from))
    }

    async fn insert_company(
        &self,
        id: Uuid,
        created_by: Uuid,
        input: &NewCompany,
    ) -> StoreResult<Company> {
        let timer = QueryTimer::new("insert_company");

        let inserted = sqlx::query(
            r#"
            INSERT INTO companies (id, name, contact_name, contact_email, contact_phone, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.contact_name.as_deref())
        .bind(input.contact_email.as_deref())
        .bind(input.contact_phone.as_deref())
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
            .map(Company::from)
            .ok_or_else(|| StoreError::not_found(format!("company {}", id)))
    }

    async fn update_company(&self, id: Uuid, changes: &CompanyChanges) -> StoreResult<Company> {
        let timer = QueryTimer::new("update_company");
        let result = sqlx::query_as::<_, CompanyEntity>(
            r#"
            UPDATE companies
            SET name = COALESCE(TRIM($2), name),
                contact_name = COALESCE($3, contact_name),
                contact_email = COALESCE($4, contact_email),
                contact_phone = COALESCE($5, contact_phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, contact_name, contact_email, contact_phone,
                      created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.contact_name.as_deref())
        .bind(changes.contact_email.as_deref())
        .bind(changes.contact_phone.as_deref())
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result
            .map_err(store_error)?
            .map(Company::from)
            .ok_or_else(|| StoreError::not_found(format!("company {}", id)))
    }

    async fn delete_company(&self, id: Uuid) -> StoreResult<()> {
        let timer = QueryTimer::new("delete_company");
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();

        result.map_err(store_error)?;
        Ok(())
    }
}
