//! Background job that removes expired flight locks.

use crate::services::DataAccess;

use super::scheduler::{Job, JobFrequency};

/// Deletes locks older than the lock expiry.
///
/// Expired locks are already ignored by every read and may be taken over,
/// so this only keeps the table small.
pub struct LockCleanupJob {
    data: DataAccess,
    interval_secs: u64,
}

impl LockCleanupJob {
    pub fn new(data: DataAccess, interval_secs: u64) -> Self {
        Self {
            data,
            interval_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for LockCleanupJob {
    fn name(&self) -> &'static str {
        "lock_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        let removed = self
            .data
            .cleanup_expired_locks()
            .await
            .into_result()
            .map_err(|(_, message)| message)?;

        if removed > 0 {
            tracing::info!(removed, "Expired flight locks removed");
        }
        Ok(())
    }
}
