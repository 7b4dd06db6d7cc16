//! Repository implementations.
//!
//! Each repository wraps the pool and implements one domain store trait.

pub mod audit_log;
pub mod company;
pub mod company_tail;
pub mod flight;
pub mod flight_lock;
pub mod flight_task;
pub mod health;

pub use audit_log::AuditLogRepository;
pub use company::CompanyRepository;
pub use company_tail::CompanyTailRepository;
pub use flight::FlightRepository;
pub use flight_lock::FlightLockRepository;
pub use flight_task::FlightTaskRepository;
pub use health::HealthRepository;
