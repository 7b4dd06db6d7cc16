//! Store traits: the narrow data operations the access layer wraps.
//!
//! Each trait covers one entity. Implementations live in the persistence
//! crate (PostgreSQL and in-memory) and report failures as [`StoreError`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    AuditLog, Company, CompanyChanges, CompanyTail, Flight, FlightChanges, FlightLock,
    FlightQuery, FlightTask, FlightTaskChanges, NewAuditLog, NewCompany, NewCompanyTail,
    NewFlight, NewFlightTask,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait FlightStore: Send + Sync {
    /// Flights matching the equality filters, in the query's sort order.
    async fn list_flights(&self, query: &FlightQuery) -> StoreResult<Vec<Flight>>;

    async fn find_flight(&self, id: Uuid) -> StoreResult<Option<Flight>>;

    /// Inserts a flight under a caller-chosen id.
    ///
    /// Inserting an id that already exists returns the stored row unchanged.
    async fn insert_flight(
        &self,
        id: Uuid,
        created_by: Uuid,
        input: &NewFlight,
    ) -> StoreResult<Flight>;

    /// Applies the present fields of `changes`. Fails with `NotFound` for an unknown id.
    async fn update_flight(&self, id: Uuid, changes: &FlightChanges) -> StoreResult<Flight>;

    /// Deletes the flight with its tasks, audit entries and lock.
    /// Deleting an absent id succeeds, so a retried delete is harmless.
    async fn delete_flight(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// All companies ordered by name.
    async fn list_companies(&self) -> StoreResult<Vec<Company>>;

    async fn find_company(&self, id: Uuid) -> StoreResult<Option<Company>>;

    async fn insert_company(
        &self,
        id: Uuid,
        created_by: Uuid,
        input: &NewCompany,
    ) -> StoreResult<Company>;

    async fn update_company(&self, id: Uuid, changes: &CompanyChanges) -> StoreResult<Company>;

    /// Deletes the company and its tail numbers; its flights are detached.
    async fn delete_company(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait CompanyTailStore: Send + Sync {
    /// Tail numbers of a company ordered by tail number.
    async fn list_company_tails(&self, company_id: Uuid) -> StoreResult<Vec<CompanyTail>>;

    async fn insert_company_tail(
        &self,
        id: Uuid,
        company_id: Uuid,
        input: &NewCompanyTail,
    ) -> StoreResult<CompanyTail>;

    async fn delete_company_tail(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait FlightTaskStore: Send + Sync {
    /// Tasks of a flight ordered by creation time.
    async fn list_flight_tasks(&self, flight_id: Uuid) -> StoreResult<Vec<FlightTask>>;

    async fn find_flight_task(&self, id: Uuid) -> StoreResult<Option<FlightTask>>;

    async fn insert_flight_task(
        &self,
        id: Uuid,
        flight_id: Uuid,
        created_by: Uuid,
        input: &NewFlightTask,
    ) -> StoreResult<FlightTask>;

    async fn update_flight_task(
        &self,
        id: Uuid,
        changes: &FlightTaskChanges,
    ) -> StoreResult<FlightTask>;

    async fn delete_flight_task(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait FlightLockStore: Send + Sync {
    async fn list_flight_locks(&self) -> StoreResult<Vec<FlightLock>>;

    async fn find_flight_lock(&self, flight_id: Uuid) -> StoreResult<Option<FlightLock>>;

    /// Writes `lock` unless another user holds a lock newer than `stale_before`.
    ///
    /// Returns the written lock, or `None` when the existing lock was kept.
    async fn try_acquire_flight_lock(
        &self,
        lock: &FlightLock,
        stale_before: DateTime<Utc>,
    ) -> StoreResult<Option<FlightLock>>;

    /// Removes the lock if `user_id` holds it. Returns whether a row was removed.
    async fn release_flight_lock(&self, flight_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    /// Removes every lock taken at or before `stale_before`.
    async fn delete_expired_flight_locks(&self, stale_before: DateTime<Utc>) -> StoreResult<u64>;
}

#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// Entries of a flight, most recent first.
    async fn list_audit_logs(&self, flight_id: Uuid) -> StoreResult<Vec<AuditLog>>;

    async fn insert_audit_log(&self, input: &NewAuditLog) -> StoreResult<AuditLog>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Round-trips to the backend.
    async fn ping(&self) -> StoreResult<()>;

    /// Records backend-specific gauges (pool usage and the like).
    fn record_metrics(&self) {}
}

/// The full set of stores an application instance talks to.
#[derive(Clone)]
pub struct Stores {
    pub flights: Arc<dyn FlightStore>,
    pub companies: Arc<dyn CompanyStore>,
    pub company_tails: Arc<dyn CompanyTailStore>,
    pub tasks: Arc<dyn FlightTaskStore>,
    pub locks: Arc<dyn FlightLockStore>,
    pub audit_logs: Arc<dyn AuditLogStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    /// Builds the bundle from one backend that implements every store.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: FlightStore
            + CompanyStore
            + CompanyTailStore
            + FlightTaskStore
            + FlightLockStore
            + AuditLogStore
            + StoreHealth
            + 'static,
    {
        Self {
            flights: backend.clone(),
            companies: backend.clone(),
            company_tails: backend.clone(),
            tasks: backend.clone(),
            locks: backend.clone(),
            audit_logs: backend.clone(),
            health: backend,
        }
    }
}
