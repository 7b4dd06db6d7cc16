//! Background job that keeps the shared connectivity signal current.

use domain::services::Connectivity;
use domain::stores::StoreHealth;
use std::sync::Arc;
use tracing::debug;

use super::scheduler::{Job, JobFrequency};

/// Pings the backend and flips the online flag.
///
/// The ping goes straight to the store, not through a retrier: a retrier
/// waits while offline, so probing through one could never observe recovery.
pub struct ConnectivityProbeJob {
    health: Arc<dyn StoreHealth>,
    connectivity: Connectivity,
    interval_secs: u64,
}

impl ConnectivityProbeJob {
    pub fn new(health: Arc<dyn StoreHealth>, connectivity: Connectivity, interval_secs: u64) -> Self {
        Self {
            health,
            connectivity,
            interval_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for ConnectivityProbeJob {
    fn name(&self) -> &'static str {
        "connectivity_probe"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    fn run_at_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        self.health.record_metrics();

        match self.health.ping().await {
            Ok(()) => {
                self.connectivity.set_online(true);
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "Connectivity probe failed");
                self.connectivity.set_online(false);
                Err(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistence::MemoryStore;

    #[tokio::test]
    async fn test_probe_tracks_reachability() {
        let store = Arc::new(MemoryStore::new());
        let connectivity = Connectivity::new(true);
        let job = ConnectivityProbeJob::new(store.clone(), connectivity.clone(), 10);
        assert!(job.run_at_start());

        store.set_reachable(false);
        assert!(job.execute().await.is_err());
        assert!(!connectivity.is_online());

        store.set_reachable(true);
        job.execute().await.unwrap();
        assert!(connectivity.is_online());
    }
}
