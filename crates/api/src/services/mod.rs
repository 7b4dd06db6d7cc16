//! Application services between the HTTP routes and the stores.

pub mod audit_recorder;
pub mod data_access;

pub use audit_recorder::AuditRecorder;
pub use data_access::DataAccess;
