//! Soft (advisory) edit lock on a flight.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minutes after which an unrefreshed lock is considered abandoned.
pub const DEFAULT_LOCK_EXPIRY_MINUTES: i64 = 15;

/// Marker that a user is currently editing a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightLock {
    pub flight_id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub locked_at: DateTime<Utc>,
}

impl FlightLock {
    pub fn new(flight_id: Uuid, user_id: Uuid, user_email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            flight_id,
            user_id,
            user_email: user_email.into(),
            locked_at: now,
        }
    }

    pub fn expires_at(&self, expiry: Duration) -> DateTime<Utc> {
        self.locked_at + expiry
    }

    /// A lock is expired once `now` reaches `locked_at + expiry`.
    pub fn is_expired(&self, now: DateTime<Utc>, expiry: Duration) -> bool {
        now >= self.expires_at(expiry)
    }

    pub fn is_held_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Result of trying to take a lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "lock", rename_all = "snake_case")]
pub enum LockOutcome {
    /// The caller now holds the lock (fresh or refreshed).
    Acquired(FlightLock),
    /// Another user holds a live lock; it was left untouched.
    HeldByOther(FlightLock),
}

impl LockOutcome {
    pub fn lock(&self) -> &FlightLock {
        match self {
            LockOutcome::Acquired(lock) | LockOutcome::HeldByOther(lock) => lock,
        }
    }

    pub fn is_acquired(&self) -> bool {
        matches!(self, LockOutcome::Acquired(_))
    }
}
