//! Classification of store failures into retryable and terminal.

use serde::Serialize;
use std::collections::HashSet;

use crate::error::StoreError;

/// Whether a failed operation may succeed if attempted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Retryability {
    /// Transient: network loss, timeouts, rate limiting, gateway errors.
    Retryable,
    /// Permanent: validation, constraint, permission and not-found failures.
    Terminal,
}

/// Backend codes treated as transient.
///
/// HTTP-style statuses for gateways in front of the database, plus the
/// PostgreSQL connection-exception class and server shutdown/overload states.
const DEFAULT_RETRYABLE_CODES: &[&str] = &[
    "408", "429", "503", "504", "522", // request timeout, rate limit, gateway
    "08000", "08001", "08003", "08004", "08006", // connection exceptions
    "53300", // too_many_connections
    "57P01", // admin_shutdown
    "57P03", // cannot_connect_now
    "57014", // query_canceled (statement timeout)
];

/// Lowercase message fragments that identify transient failures.
const DEFAULT_RETRYABLE_PATTERNS: &[&str] = &[
    "network error",
    "networkerror",
    "failed to fetch",
    "timeout",
    "timed out",
    "etimedout",
    "connection refused",
    "econnrefused",
    "socket hang up",
    "econnreset",
    "connection reset",
    "pool timed out",
];

/// Table-driven retry policy.
///
/// Codes are checked before message patterns; anything unmatched is terminal.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    codes: HashSet<String>,
    patterns: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            codes: DEFAULT_RETRYABLE_CODES.iter().map(|c| c.to_string()).collect(),
            patterns: DEFAULT_RETRYABLE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl RetryPolicy {
    /// Adds codes to the retryable table.
    pub fn with_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Adds message fragments to the retryable table (matched case-insensitively).
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns
            .extend(patterns.into_iter().map(|p| p.into().to_lowercase()));
        self
    }

    /// Classifies a failure given the current connectivity state.
    pub fn classify(&self, error: &StoreError, online: bool) -> Retryability {
        if !online {
            return Retryability::Retryable;
        }

        if let Some(code) = error.code() {
            if self.codes.contains(&code) {
                return Retryability::Retryable;
            }
        }

        let message = error.message().to_lowercase();
        if self.patterns.iter().any(|p| message.contains(p.as_str())) {
            return Retryability::Retryable;
        }

        Retryability::Terminal
    }

    pub fn is_retryable(&self, error: &StoreError, online: bool) -> bool {
        self.classify(error, online) == Retryability::Retryable
    }
}
