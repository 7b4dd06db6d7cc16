//! Backend health check.

use async_trait::async_trait;
use domain::stores::{StoreHealth, StoreResult};
use sqlx::PgPool;

use crate::db;
use crate::error::store_error;
use crate::metrics::{record_pool_metrics, QueryTimer};

#[derive(Clone)]
pub struct HealthRepository {
    pool: PgPool,
}

impl HealthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for HealthRepository {
    async fn ping(&self) -> StoreResult<()> {
        let timer = QueryTimer::new("ping");
        let result = db::ping(&self.pool).await;
        timer.record();
        result.map_err(store_error)
    }

    fn record_metrics(&self) {
        record_pool_metrics(&self.pool);
    }
}
