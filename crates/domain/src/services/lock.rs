//! Soft-lock rules: expiry, ownership and acquisition outcome.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::{FlightLock, LockOutcome, DEFAULT_LOCK_EXPIRY_MINUTES};

/// Expiry policy for advisory flight locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    expiry: Duration,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_LOCK_EXPIRY_MINUTES)
    }
}

impl LockPolicy {
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            expiry: Duration::minutes(minutes),
        }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Locks taken at or before this instant are expired.
    pub fn stale_before(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.expiry
    }

    pub fn is_live(&self, lock: &FlightLock, now: DateTime<Utc>) -> bool {
        !lock.is_expired(now, self.expiry)
    }

    /// Whether `user_id` may take the lock given the current holder.
    pub fn can_acquire(
        &self,
        existing: Option<&FlightLock>,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> bool {
        match existing {
            None => true,
            Some(lock) => lock.is_held_by(user_id) || !self.is_live(lock, now),
        }
    }

    /// Interprets the store's conditional write.
    ///
    /// `written` is the row the store wrote, `current` the row it kept when
    /// the write was refused. `None` means the holder released in between
    /// and the write should be attempted again.
    pub fn outcome(
        &self,
        written: Option<FlightLock>,
        current: Option<FlightLock>,
    ) -> Option<LockOutcome> {
        match (written, current) {
            (Some(lock), _) => Some(LockOutcome::Acquired(lock)),
            (None, Some(holder)) => Some(LockOutcome::HeldByOther(holder)),
            (None, None) => None,
        }
    }

    /// Live locks only, oldest first.
    pub fn active(&self, locks: Vec<FlightLock>, now: DateTime<Utc>) -> Vec<FlightLock> {
        let mut live: Vec<_> = locks
            .into_iter()
            .filter(|lock| self.is_live(lock, now))
            .collect();
        live.sort_by(|a, b| a.locked_at.cmp(&b.locked_at));
        live
    }
}
