//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod audit_log;
pub mod company;
pub mod company_tail;
pub mod flight;
pub mod flight_lock;
pub mod flight_task;

pub use audit_log::AuditLogEntity;
pub use company::CompanyEntity;
pub use company_tail::CompanyTailEntity;
pub use flight::FlightEntity;
pub use flight_lock::FlightLockEntity;
pub use flight_task::FlightTaskEntity;
