//! Uniform `{data, error}` result returned by data-access operations.

use serde::{Deserialize, Serialize};

/// Category of a failed operation, used by callers to pick a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Conflict,
    NotFound,
    PermissionDenied,
    Unavailable,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "validation",
            ErrorCode::Conflict => "conflict",
            ErrorCode::NotFound => "not_found",
            ErrorCode::PermissionDenied => "permission_denied",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::Unknown => "unknown",
        }
    }
}

/// Outcome of a data-access operation.
///
/// Exactly one of `data` and `error` is set. Operations never fail any other
/// way: every backend failure is folded into `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResult<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl<T> DataResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn err(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
            code: Some(code),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> DataResult<U> {
        DataResult {
            data: self.data.map(f),
            error: self.error,
            code: self.code,
        }
    }

    /// Carries a failure over to a result of another type.
    pub fn cast_err<U>(self) -> DataResult<U> {
        DataResult {
            data: None,
            error: self.error,
            code: self.code,
        }
    }

    pub fn into_result(self) -> Result<T, (ErrorCode, String)> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, error) => Err((
                self.code.unwrap_or(ErrorCode::Unknown),
                error.unwrap_or_default(),
            )),
        }
    }
}
