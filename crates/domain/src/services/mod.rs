//! Domain services for flight scheduling.
//!
//! Services contain business logic that operates on domain models.

pub mod audit;
pub mod connectivity;
pub mod error_message;
pub mod flight_filter;
pub mod lock;
pub mod retry;
pub mod retry_policy;

pub use audit::AuditLogBuilder;
pub use connectivity::Connectivity;
pub use flight_filter::FlightFilter;
pub use lock::LockPolicy;
pub use retry::{RetryConfig, Retrier};
pub use retry_policy::{RetryPolicy, Retryability};
