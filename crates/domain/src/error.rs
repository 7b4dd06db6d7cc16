//! Failure type shared by every data store.

use thiserror::Error;

/// Error returned by a store operation.
///
/// Store implementations translate their native failures into this type so
/// the retry policy and the user-facing message table can reason about a
/// single shape: an optional backend code plus a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("Network error: {0}")]
    Unavailable(String),

    /// The backend did not answer in time.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a transport-level status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The database rejected the statement.
    #[error("{message}")]
    Database {
        code: Option<String>,
        message: String,
    },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Input was rejected before reaching the backend.
    #[error("{0}")]
    Validation(String),
}

impl StoreError {
    /// Backend error code, if the failure carries one.
    ///
    /// Transport statuses are rendered as their decimal value so that HTTP
    /// statuses and SQLSTATE codes live in the same lookup table.
    pub fn code(&self) -> Option<String> {
        match self {
            StoreError::Status { status, .. } => Some(status.to_string()),
            StoreError::Database { code, .. } => code.clone(),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        StoreError::NotFound(what.into())
    }

    /// Unique-key violation, shaped like the SQLSTATE 23505 PostgreSQL raises.
    pub fn duplicate(what: impl Into<String>) -> Self {
        StoreError::database(
            Some("23505"),
            format!("duplicate key value violates unique constraint: {}", what.into()),
        )
    }

    pub fn database(code: Option<&str>, message: impl Into<String>) -> Self {
        StoreError::Database {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_from_status() {
        let err = StoreError::Status {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.code().as_deref(), Some("503"));
        assert_eq!(err.message(), "Service Unavailable");
    }

    #[test]
    fn test_code_from_database() {
        let err = StoreError::database(Some("23505"), "duplicate key value");
        assert_eq!(err.code().as_deref(), Some("23505"));
    }

    #[test]
    fn test_duplicate_carries_unique_violation_code() {
        let err = StoreError::duplicate("flights_pkey");
        assert_eq!(err.code().as_deref(), Some("23505"));
        assert!(err.message().contains("duplicate key"));
    }

    #[test]
    fn test_no_code() {
        assert!(StoreError::Unavailable("down".into()).code().is_none());
        assert!(StoreError::not_found("flight").code().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StoreError::Unavailable("connection refused".into()).to_string(),
            "Network error: connection refused"
        );
        assert_eq!(
            StoreError::Timeout("pool".into()).to_string(),
            "Request timed out: pool"
        );
        assert_eq!(
            StoreError::not_found("flight 1").to_string(),
            "Record not found: flight 1"
        );
        assert_eq!(
            StoreError::PermissionDenied("flights".into()).to_string(),
            "Permission denied: flights"
        );
    }
}
