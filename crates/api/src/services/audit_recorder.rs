//! Best-effort audit trail writes for flight mutations.

use domain::models::{CurrentUser, Flight, FlightChanges, NewAuditLog};
use domain::services::{AuditLogBuilder, Retrier};
use domain::stores::AuditLogStore;
use std::sync::Arc;
use tracing::{debug, error};

/// Writes audit entries after a flight mutation has already succeeded.
///
/// A failed write is logged and swallowed: it never fails or undoes the
/// mutation it describes.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditLogStore>,
    retrier: Retrier,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditLogStore>, retrier: Retrier) -> Self {
        Self { store, retrier }
    }

    /// Records `{new: <flight>}` for a created flight.
    ///
    /// The entry reuses the flight id, so replaying the create cannot add a
    /// second creation entry.
    pub async fn flight_created(&self, user: &CurrentUser, flight: &Flight) -> bool {
        let entry = AuditLogBuilder::flight_created(user.id, flight)
            .with_id(flight.id)
            .build();
        self.record(entry).await
    }

    /// Records `{previous: <snapshot>, new: <submitted changes>}` for an update.
    pub async fn flight_updated(
        &self,
        user: &CurrentUser,
        previous: &Flight,
        submitted: &FlightChanges,
    ) -> bool {
        let entry = AuditLogBuilder::flight_updated(user.id, previous, submitted).build();
        self.record(entry).await
    }

    /// Returns whether the entry was stored.
    async fn record(&self, entry: NewAuditLog) -> bool {
        let store = &self.store;
        let entry = &entry;
        match self
            .retrier
            .run("insert_audit_log", || store.insert_audit_log(entry))
            .await
        {
            Ok(log) => {
                debug!(
                    audit_log_id = %log.id,
                    flight_id = %log.flight_id,
                    action = %log.action,
                    "Audit entry recorded"
                );
                true
            }
            Err(e) => {
                error!(
                    flight_id = %entry.flight_id,
                    action = %entry.action,
                    error = %e,
                    "Failed to record audit entry"
                );
                false
            }
        }
    }
}
