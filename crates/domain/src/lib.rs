//! Domain layer for the flight scheduler backend.
//!
//! This crate contains:
//! - Domain models (Flight, Company, FlightTask, FlightLock, AuditLog)
//! - Store traits implemented by the persistence layer
//! - The retry policy, backoff retrier and connectivity signal
//! - Audit, lock and filtering services

pub mod error;
pub mod models;
pub mod services;
pub mod stores;

pub use error::StoreError;
