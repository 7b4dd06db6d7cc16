//! Persistence layer for the flight scheduler backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - PostgreSQL repositories implementing the domain store traits
//! - An in-memory store with the same constraints, used for tests and local runs

pub mod db;
pub mod entities;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod repositories;

use domain::stores::Stores;
use sqlx::PgPool;
use std::sync::Arc;

pub use error::store_error;
pub use memory::MemoryStore;

/// Builds the store bundle backed by PostgreSQL repositories.
pub fn postgres_stores(pool: PgPool) -> Stores {
    Stores {
        flights: Arc::new(repositories::FlightRepository::new(pool.clone())),
        companies: Arc::new(repositories::CompanyRepository::new(pool.clone())),
        company_tails: Arc::new(repositories::CompanyTailRepository::new(pool.clone())),
        tasks: Arc::new(repositories::FlightTaskRepository::new(pool.clone())),
        locks: Arc::new(repositories::FlightLockRepository::new(pool.clone())),
        audit_logs: Arc::new(repositories::AuditLogRepository::new(pool.clone())),
        health: Arc::new(repositories::HealthRepository::new(pool)),
    }
}
