//! Background job scheduler and job implementations.

mod connectivity_probe;
mod lock_cleanup;
mod scheduler;

pub use connectivity_probe::ConnectivityProbeJob;
pub use lock_cleanup::LockCleanupJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
