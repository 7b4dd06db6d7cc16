//! Domain models for flight scheduling.

pub mod audit_log;
pub mod company;
pub mod flight;
pub mod flight_lock;
pub mod flight_task;
pub mod result;
pub mod user;

pub use audit_log::{AuditAction, AuditChanges, AuditLog, NewAuditLog};
pub use company::{Company, CompanyChanges, CompanyTail, NewCompany, NewCompanyTail};
pub use flight::{Flight, FlightChanges, FlightQuery, FlightSort, FlightStatus, NewFlight};
pub use flight_lock::{FlightLock, LockOutcome, DEFAULT_LOCK_EXPIRY_MINUTES};
pub use flight_task::{FlightTask, FlightTaskChanges, NewFlightTask};
pub use result::{DataResult, ErrorCode};
pub use user::CurrentUser;
