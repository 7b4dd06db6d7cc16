//! Resource access facade.
//!
//! Every operation validates its input locally, runs the store call through
//! the [`Retrier`] and folds the outcome into a [`DataResult`]. Nothing here
//! returns an error or panics on a backend failure.

use chrono::Utc;
use domain::models::{
    AuditLog, Company, CompanyChanges, CompanyTail, CurrentUser, DataResult, ErrorCode, Flight,
    FlightChanges, FlightLock, FlightQuery, FlightTask, FlightTaskChanges, LockOutcome,
    NewCompany, NewCompanyTail, NewFlight, NewFlightTask,
};
use domain::services::error_message::NOT_FOUND_MESSAGE;
use domain::services::{FlightFilter, LockPolicy, Retrier};
use domain::stores::Stores;
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::audit_recorder::AuditRecorder;
use crate::error::validation_message;

const NO_CHANGES_MESSAGE: &str = "No changes were submitted.";
const LOCK_CONTENDED_MESSAGE: &str =
    "The edit lock changed while it was being acquired. Please try again.";

/// Typed data operations for every entity.
#[derive(Clone)]
pub struct DataAccess {
    stores: Stores,
    retrier: Retrier,
    locks: LockPolicy,
    audit: AuditRecorder,
}

impl DataAccess {
    pub fn new(stores: Stores, retrier: Retrier, locks: LockPolicy) -> Self {
        let audit = AuditRecorder::new(stores.audit_logs.clone(), retrier.clone());
        Self {
            stores,
            retrier,
            locks,
            audit,
        }
    }

    pub fn retrier(&self) -> &Retrier {
        &self.retrier
    }

    pub fn lock_policy(&self) -> LockPolicy {
        self.locks
    }

    // ========================================================================
    // Flights
    // ========================================================================

    pub async fn list_flights(&self, query: &FlightQuery) -> DataResult<Vec<Flight>> {
        let flights = &self.stores.flights;
        self.retrier
            .execute("list_flights", || flights.list_flights(query))
            .await
    }

    /// Lists flights, then applies the search text and date window in memory.
    pub async fn search_flights(
        &self,
        query: &FlightQuery,
        filter: &FlightFilter,
    ) -> DataResult<Vec<Flight>> {
        self.list_flights(query)
            .await
            .map(|flights| filter.apply(flights))
    }

    pub async fn get_flight(&self, id: Uuid) -> DataResult<Flight> {
        let flights = &self.stores.flights;
        found(
            self.retrier
                .execute("get_flight", || flights.find_flight(id))
                .await,
        )
    }

    pub async fn create_flight(&self, user: &CurrentUser, input: NewFlight) -> DataResult<Flight> {
        let input = input.normalized();
        if let Err(errors) = input.check() {
            return invalid(&errors);
        }

        // Chosen once so every retry targets the same row.
        let id = input.id.unwrap_or_else(Uuid::new_v4);
        let flights = &self.stores.flights;
        let input = &input;
        let result = self
            .retrier
            .run("create_flight", || flights.insert_flight(id, user.id, input))
            .await;

        match result {
            Ok(flight) => {
                info!(flight_id = %flight.id, tail_number = %flight.tail_number, "Flight created");
                self.audit.flight_created(user, &flight).await;
                DataResult::ok(flight)
            }
            Err(e) => self.retrier.to_data_result(&e),
        }
    }

    pub async fn update_flight(
        &self,
        user: &CurrentUser,
        id: Uuid,
        changes: FlightChanges,
    ) -> DataResult<Flight> {
        let changes = changes.normalized();
        if changes.is_empty() {
            return DataResult::err(ErrorCode::Validation, NO_CHANGES_MESSAGE);
        }

        let previous = match self.get_flight(id).await.into_result() {
            Ok(flight) => flight,
            Err((code, message)) => return DataResult::err(code, message),
        };
        if let Err(errors) = changes.check_against(&previous) {
            return invalid(&errors);
        }

        let flights = &self.stores.flights;
        let submitted = &changes;
        let result = self
            .retrier
            .run("update_flight", || flights.update_flight(id, submitted))
            .await;

        match result {
            Ok(flight) => {
                info!(flight_id = %id, status = %flight.status, "Flight updated");
                self.audit.flight_updated(user, &previous, &changes).await;
                DataResult::ok(flight)
            }
            Err(e) => self.retrier.to_data_result(&e),
        }
    }

    /// Cancellation is an audited status change; the row is kept.
    pub async fn cancel_flight(&self, user: &CurrentUser, id: Uuid) -> DataResult<Flight> {
        self.update_flight(user, id, FlightChanges::cancel()).await
    }

    /// Removes the flight together with its tasks, audit trail and lock.
    pub async fn delete_flight(&self, id: Uuid) -> DataResult<()> {
        let flights = &self.stores.flights;
        let result = self
            .retrier
            .execute("delete_flight", || flights.delete_flight(id))
            .await;
        if result.is_ok() {
            info!(flight_id = %id, "Flight deleted");
        }
        result
    }

    // ========================================================================
    // Companies
    // ========================================================================

    pub async fn list_companies(&self) -> DataResult<Vec<Company>> {
        let companies = &self.stores.companies;
        self.retrier
            .execute("list_companies", || companies.list_companies())
            .await
    }

    pub async fn get_company(&self, id: Uuid) -> DataResult<Company> {
        let companies = &self.stores.companies;
        found(
            self.retrier
                .execute("get_company", || companies.find_company(id))
                .await,
        )
    }

    pub async fn create_company(
        &self,
        user: &CurrentUser,
        input: NewCompany,
    ) -> DataResult<Company> {
        let input = input.normalized();
        if let Err(errors) = input.validate() {
            return invalid(&errors);
        }

        let id = input.id.unwrap_or_else(Uuid::new_v4);
        let companies = &self.stores.companies;
        let input = &input;
        let result = self
            .retrier
            .execute("create_company", || {
                companies.insert_company(id, user.id, input)
            })
            .await;
        if let Some(company) = &result.data {
            info!(company_id = %company.id, "Company created");
        }
        result
    }

    pub async fn update_company(&self, id: Uuid, changes: CompanyChanges) -> DataResult<Company> {
        if let Err(errors) = changes.validate() {
            return invalid(&errors);
        }

        let companies = &self.stores.companies;
        let changes = &changes;
        self.retrier
            .execute("update_company", || companies.update_company(id, changes))
            .await
    }

    /// Deletes the company and its tail numbers; its flights keep existing
    /// without a company.
    pub async fn delete_company(&self, id: Uuid) -> DataResult<()> {
        let companies = &self.stores.companies;
        self.retrier
            .execute("delete_company", || companies.delete_company(id))
            .await
    }

    // ========================================================================
    // Company tails
    // ========================================================================

    pub async fn list_company_tails(&self, company_id: Uuid) -> DataResult<Vec<CompanyTail>> {
        let tails = &self.stores.company_tails;
        self.retrier
            .execute("list_company_tails", || tails.list_company_tails(company_id))
            .await
    }

    pub async fn create_company_tail(
        &self,
        company_id: Uuid,
        input: NewCompanyTail,
    ) -> DataResult<CompanyTail> {
        let input = input.normalized();
        if let Err(errors) = input.validate() {
            return invalid(&errors);
        }

        let id = input.id.unwrap_or_else(Uuid::new_v4);
        let tails = &self.stores.company_tails;
        let input = &input;
        self.retrier
            .execute("create_company_tail", || {
                tails.insert_company_tail(id, company_id, input)
            })
            .await
    }

    pub async fn delete_company_tail(&self, id: Uuid) -> DataResult<()> {
        let tails = &self.stores.company_tails;
        self.retrier
            .execute("delete_company_tail", || tails.delete_company_tail(id))
            .await
    }

    // ========================================================================
    // Flight tasks
    // ========================================================================

    pub async fn list_flight_tasks(&self, flight_id: Uuid) -> DataResult<Vec<FlightTask>> {
        let tasks = &self.stores.tasks;
        self.retrier
            .execute("list_flight_tasks", || tasks.list_flight_tasks(flight_id))
            .await
    }

    pub async fn create_flight_task(
        &self,
        user: &CurrentUser,
        flight_id: Uuid,
        input: NewFlightTask,
    ) -> DataResult<FlightTask> {
        if let Err(errors) = input.validate() {
            return invalid(&errors);
        }

        let id = input.id.unwrap_or_else(Uuid::new_v4);
        let tasks = &self.stores.tasks;
        let input = &input;
        self.retrier
            .execute("create_flight_task", || {
                tasks.insert_flight_task(id, flight_id, user.id, input)
            })
            .await
    }

    pub async fn update_flight_task(
        &self,
        id: Uuid,
        changes: FlightTaskChanges,
    ) -> DataResult<FlightTask> {
        if let Err(errors) = changes.validate() {
            return invalid(&errors);
        }

        let tasks = &self.stores.tasks;
        let changes = &changes;
        self.retrier
            .execute("update_flight_task", || tasks.update_flight_task(id, changes))
            .await
    }

    /// Flips the completion flag of a task.
    pub async fn toggle_flight_task(&self, id: Uuid) -> DataResult<FlightTask> {
        let tasks = &self.stores.tasks;
        let current = match found(
            self.retrier
                .execute("get_flight_task", || tasks.find_flight_task(id))
                .await,
        )
        .into_result()
        {
            Ok(task) => task,
            Err((code, message)) => return DataResult::err(code, message),
        };

        self.update_flight_task(id, FlightTaskChanges::toggle(&current))
            .await
    }

    pub async fn delete_flight_task(&self, id: Uuid) -> DataResult<()> {
        let tasks = &self.stores.tasks;
        self.retrier
            .execute("delete_flight_task", || tasks.delete_flight_task(id))
            .await
    }

    // ========================================================================
    // Flight locks
    // ========================================================================

    /// Live locks, oldest first.
    pub async fn list_flight_locks(&self) -> DataResult<Vec<FlightLock>> {
        let locks = &self.stores.locks;
        let policy = self.locks;
        self.retrier
            .execute("list_flight_locks", || locks.list_flight_locks())
            .await
            .map(|all| policy.active(all, Utc::now()))
    }

    /// Takes or refreshes the caller's lock on a flight.
    ///
    /// A live lock held by someone else is left untouched and reported as
    /// [`LockOutcome::HeldByOther`].
    pub async fn acquire_flight_lock(
        &self,
        user: &CurrentUser,
        flight_id: Uuid,
    ) -> DataResult<LockOutcome> {
        let locks = &self.stores.locks;

        // The holder may release between the refused write and the read;
        // one more write settles it.
        for _ in 0..2 {
            let now = Utc::now();
            let requested = FlightLock::new(flight_id, user.id, user.email.as_str(), now);
            let stale_before = self.locks.stale_before(now);
            let requested = &requested;

            let written = match self
                .retrier
                .run("acquire_flight_lock", || {
                    locks.try_acquire_flight_lock(requested, stale_before)
                })
                .await
            {
                Ok(written) => written,
                Err(e) => return self.retrier.to_data_result(&e),
            };

            let current = match written {
                Some(_) => None,
                None => match self
                    .retrier
                    .run("find_flight_lock", || locks.find_flight_lock(flight_id))
                    .await
                {
                    Ok(current) => current,
                    Err(e) => return self.retrier.to_data_result(&e),
                },
            };

            if let Some(outcome) = self.locks.outcome(written, current) {
                info!(
                    flight_id = %flight_id,
                    user_id = %user.id,
                    acquired = outcome.is_acquired(),
                    "Flight lock requested"
                );
                return DataResult::ok(outcome);
            }
        }

        DataResult::err(ErrorCode::Conflict, LOCK_CONTENDED_MESSAGE)
    }

    /// Drops the caller's lock. Releasing a lock the caller does not hold
    /// is a successful no-op; the flag tells whether a row was removed.
    pub async fn release_flight_lock(&self, user: &CurrentUser, flight_id: Uuid) -> DataResult<bool> {
        let locks = &self.stores.locks;
        self.retrier
            .execute("release_flight_lock", || {
                locks.release_flight_lock(flight_id, user.id)
            })
            .await
    }

    /// Deletes every expired lock and returns how many were removed.
    pub async fn cleanup_expired_locks(&self) -> DataResult<u64> {
        let locks = &self.stores.locks;
        let stale_before = self.locks.stale_before(Utc::now());
        self.retrier
            .execute("cleanup_expired_locks", || {
                locks.delete_expired_flight_locks(stale_before)
            })
            .await
    }

    // ========================================================================
    // Audit logs
    // ========================================================================

    /// Audit trail of a flight, most recent first.
    pub async fn list_audit_logs(&self, flight_id: Uuid) -> DataResult<Vec<AuditLog>> {
        let audit_logs = &self.stores.audit_logs;
        self.retrier
            .execute("list_audit_logs", || audit_logs.list_audit_logs(flight_id))
            .await
    }
}

fn invalid<T>(errors: &ValidationErrors) -> DataResult<T> {
    DataResult::err(ErrorCode::Validation, validation_message(errors))
}

/// Turns an empty lookup into a not-found failure.
fn found<T>(result: DataResult<Option<T>>) -> DataResult<T> {
    match result.into_result() {
        Ok(Some(value)) => DataResult::ok(value),
        Ok(None) => DataResult::err(ErrorCode::NotFound, NOT_FOUND_MESSAGE),
        Err((code, message)) => DataResult::err(code, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use domain::models::{AuditAction, FlightStatus};
    use domain::services::error_message::{
        DUPLICATE_MESSAGE, OVERLAP_MESSAGE, UNAVAILABLE_MESSAGE,
    };
    use domain::services::{Connectivity, RetryConfig, RetryPolicy};
    use domain::stores::FlightLockStore;
    use domain::StoreError;
    use persistence::MemoryStore;
    use std::sync::Arc;

    fn retrier(connectivity: Connectivity) -> Retrier {
        Retrier::new(
            RetryConfig {
                max_attempts: 3,
                initial_delay: std::time::Duration::from_millis(1),
                max_delay: std::time::Duration::from_millis(5),
            },
            RetryPolicy::default(),
            connectivity,
        )
    }

    fn facade() -> (Arc<MemoryStore>, DataAccess) {
        let store = Arc::new(MemoryStore::new());
        let data = DataAccess::new(
            store.clone().into_stores(),
            retrier(Connectivity::default()),
            LockPolicy::default(),
        );
        (store, data)
    }

    fn user() -> CurrentUser {
        CurrentUser::new(Uuid::new_v4(), "dispatch@example.com")
    }

    fn base() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-07-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn new_flight(tail: &str, start_hour: i64, hours: i64) -> NewFlight {
        NewFlight {
            id: None,
            tail_number: tail.to_string(),
            start_time: base() + Duration::hours(start_hour),
            end_time: base() + Duration::hours(start_hour + hours),
            start_airport: "lax".to_string(),
            end_airport: "sfo".to_string(),
            notes: None,
            company_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_flight_normalizes_and_audits() {
        let (_store, data) = facade();
        let user = user();

        let flight = data
            .create_flight(&user, new_flight("n123ab", 0, 2))
            .await
            .into_result()
            .unwrap();

        assert_eq!(flight.tail_number, "N123AB");
        assert_eq!(flight.start_airport, "LAX");
        assert_eq!(flight.created_by, user.id);

        let logs = data.list_audit_logs(flight.id).await.into_result().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, AuditAction::Create);
        assert_eq!(logs[0].changes.new["id"], serde_json::json!(flight.id));
    }

    #[tokio::test]
    async fn test_same_airports_rejected_without_backend_call() {
        let (store, data) = facade();
        let mut input = new_flight("N1", 0, 2);
        input.end_airport = "LAX".to_string();

        let result = data.create_flight(&user(), input).await;

        assert_eq!(result.code, Some(ErrorCode::Validation));
        assert!(result.data.is_none());
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_overlapping_flight_rejected_with_message() {
        let (store, data) = facade();
        let user = user();
        assert!(data.create_flight(&user, new_flight("N1", 0, 4)).await.is_ok());
        let calls_before = store.calls();

        let result = data.create_flight(&user, new_flight("N1", 2, 4)).await;

        assert_eq!(result.code, Some(ErrorCode::Conflict));
        assert_eq!(result.error.as_deref(), Some(OVERLAP_MESSAGE));
        // Terminal: exactly one attempt.
        assert_eq!(store.calls(), calls_before + 1);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let (store, data) = facade();
        store
            .fail_times(2, StoreError::Unavailable("connection reset by peer".into()))
            .await;

        let result = data.list_flights(&FlightQuery::default()).await;

        assert!(result.is_ok());
        assert_eq!(store.calls(), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted_reports_unavailable() {
        let (store, data) = facade();
        store
            .fail_times(5, StoreError::Timeout("statement timed out".into()))
            .await;

        let result = data.list_companies().await;

        assert_eq!(result.code, Some(ErrorCode::Unavailable));
        assert_eq!(result.error.as_deref(), Some(UNAVAILABLE_MESSAGE));
        assert_eq!(store.calls(), 3);
    }

    #[tokio::test]
    async fn test_terminal_failure_attempted_once() {
        let (store, data) = facade();
        store
            .fail_next(StoreError::PermissionDenied("flights".into()))
            .await;

        let result = data.get_flight(Uuid::new_v4()).await;

        assert_eq!(result.code, Some(ErrorCode::PermissionDenied));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_replayed_create_does_not_duplicate() {
        let (_store, data) = facade();
        let user = user();
        let mut input = new_flight("N1", 0, 2);
        input.id = Some(Uuid::new_v4());

        let first = data.create_flight(&user, input.clone()).await.into_result().unwrap();
        let second = data.create_flight(&user, input).await.into_result().unwrap();

        assert_eq!(first, second);
        let flights = data
            .list_flights(&FlightQuery::default())
            .await
            .into_result()
            .unwrap();
        assert_eq!(flights.len(), 1);
        let logs = data.list_audit_logs(first.id).await.into_result().unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[tokio::test]
    async fn test_create_reusing_another_flights_id_conflicts() {
        let (store, data) = facade();
        let alice = user();
        let bob = user();
        let first = data
            .create_flight(&alice, new_flight("N1", 0, 2))
            .await
            .into_result()
            .unwrap();

        let mut input = new_flight("N999", 4, 2);
        input.id = Some(first.id);
        let calls_before = store.calls();
        let result = data.create_flight(&bob, input).await;

        assert_eq!(result.code, Some(ErrorCode::Conflict));
        assert_eq!(result.error.as_deref(), Some(DUPLICATE_MESSAGE));
        assert!(result.data.is_none());
        assert_eq!(store.calls() - calls_before, 1);

        let stored = data.get_flight(first.id).await.into_result().unwrap();
        assert_eq!(stored.tail_number, "N1");
        assert_eq!(stored.created_by, alice.id);
        let logs = data.list_audit_logs(first.id).await.into_result().unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[tokio::test]
    async fn test_update_writes_one_audit_entry() {
        let (_store, data) = facade();
        let user = user();
        let before = data
            .create_flight(&user, new_flight("N1", 0, 2))
            .await
            .into_result()
            .unwrap();
        let changes = FlightChanges {
            notes: Some("Catering confirmed".to_string()),
            ..Default::default()
        };

        let after = data
            .update_flight(&user, before.id, changes.clone())
            .await
            .into_result()
            .unwrap();
        assert_eq!(after.notes.as_deref(), Some("Catering confirmed"));

        let logs = data.list_audit_logs(before.id).await.into_result().unwrap();
        let updates: Vec<_> = logs
            .iter()
            .filter(|l| l.action == AuditAction::Update)
            .collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(
            updates[0].changes.previous,
            Some(serde_json::to_value(&before).unwrap())
        );
        assert_eq!(
            updates[0].changes.new,
            serde_json::to_value(&changes).unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_checks_merged_schedule() {
        let (_store, data) = facade();
        let user = user();
        let flight = data
            .create_flight(&user, new_flight("N1", 0, 2))
            .await
            .into_result()
            .unwrap();

        let result = data
            .update_flight(
                &user,
                flight.id,
                FlightChanges {
                    end_time: Some(flight.start_time - Duration::hours(1)),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(result.code, Some(ErrorCode::Validation));

        let empty = data
            .update_flight(&user, flight.id, FlightChanges::default())
            .await;
        assert_eq!(empty.error.as_deref(), Some(NO_CHANGES_MESSAGE));
    }

    #[tokio::test]
    async fn test_update_unknown_flight_is_not_found() {
        let (_store, data) = facade();
        let result = data
            .update_flight(&user(), Uuid::new_v4(), FlightChanges::cancel())
            .await;
        assert_eq!(result.code, Some(ErrorCode::NotFound));
    }

    #[tokio::test]
    async fn test_cancel_keeps_flight_and_frees_slot() {
        let (_store, data) = facade();
        let user = user();
        let flight = data
            .create_flight(&user, new_flight("N1", 0, 4))
            .await
            .into_result()
            .unwrap();

        let cancelled = data
            .cancel_flight(&user, flight.id)
            .await
            .into_result()
            .unwrap();
        assert_eq!(cancelled.status, FlightStatus::Cancelled);

        assert!(data.get_flight(flight.id).await.is_ok());
        assert!(data
            .create_flight(&user, new_flight("N1", 1, 2))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_delete_flight_removes_dependents() {
        let (_store, data) = facade();
        let user = user();
        let flight = data
            .create_flight(&user, new_flight("N1", 0, 2))
            .await
            .into_result()
            .unwrap();
        data.create_flight_task(
            &user,
            flight.id,
            NewFlightTask {
                id: None,
                description: "File flight plan".to_string(),
                due_date: None,
            },
        )
        .await
        .into_result()
        .unwrap();
        data.acquire_flight_lock(&user, flight.id)
            .await
            .into_result()
            .unwrap();

        assert!(data.delete_flight(flight.id).await.is_ok());

        assert!(data.list_flight_tasks(flight.id).await.data.unwrap().is_empty());
        assert!(data.list_audit_logs(flight.id).await.data.unwrap().is_empty());
        assert!(data.list_flight_locks().await.data.unwrap().is_empty());
        assert_eq!(
            data.get_flight(flight.id).await.code,
            Some(ErrorCode::NotFound)
        );
    }

    #[tokio::test]
    async fn test_list_is_stable_and_search_filters() {
        let (_store, data) = facade();
        let user = user();
        for (tail, hour) in [("N3", 6), ("N1", 0), ("N2", 3)] {
            data.create_flight(&user, new_flight(tail, hour, 2))
                .await
                .into_result()
                .unwrap();
        }

        let query = FlightQuery::default();
        let first = data.list_flights(&query).await.into_result().unwrap();
        let second = data.list_flights(&query).await.into_result().unwrap();
        assert_eq!(first, second);
        let tails: Vec<_> = first.iter().map(|f| f.tail_number.as_str()).collect();
        assert_eq!(tails, vec!["N1", "N2", "N3"]);

        let filter = FlightFilter {
            search: Some("n2".to_string()),
            ..Default::default()
        };
        let found = data.search_flights(&query, &filter).await.into_result().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].tail_number, "N2");
    }

    #[tokio::test]
    async fn test_lock_lifecycle() {
        let (_store, data) = facade();
        let alice = user();
        let bob = CurrentUser::new(Uuid::new_v4(), "bob@example.com");
        let flight = data
            .create_flight(&alice, new_flight("N1", 0, 2))
            .await
            .into_result()
            .unwrap();

        let taken = data
            .acquire_flight_lock(&alice, flight.id)
            .await
            .into_result()
            .unwrap();
        assert!(taken.is_acquired());

        let refused = data
            .acquire_flight_lock(&bob, flight.id)
            .await
            .into_result()
            .unwrap();
        assert_eq!(refused, LockOutcome::HeldByOther(taken.lock().clone()));

        let refreshed = data
            .acquire_flight_lock(&alice, flight.id)
            .await
            .into_result()
            .unwrap();
        assert!(refreshed.is_acquired());
        assert!(refreshed.lock().locked_at >= taken.lock().locked_at);

        assert_eq!(data.release_flight_lock(&bob, flight.id).await.data, Some(false));
        assert_eq!(data.release_flight_lock(&alice, flight.id).await.data, Some(true));
        assert_eq!(data.release_flight_lock(&alice, flight.id).await.data, Some(false));
        assert!(data.list_flight_locks().await.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expired_lock_is_taken_over_and_cleaned_up() {
        let (store, data) = facade();
        let alice = user();
        let bob = CurrentUser::new(Uuid::new_v4(), "bob@example.com");
        let flight = data
            .create_flight(&alice, new_flight("N1", 0, 2))
            .await
            .into_result()
            .unwrap();
        let now = Utc::now();
        let old = FlightLock::new(flight.id, alice.id, alice.email.as_str(), now - Duration::minutes(20));
        store
            .try_acquire_flight_lock(&old, now - Duration::minutes(15))
            .await
            .unwrap();

        // Expired locks are hidden from the listing.
        assert!(data.list_flight_locks().await.data.unwrap().is_empty());

        assert_eq!(data.cleanup_expired_locks().await.data, Some(1));
        assert!(store.list_flight_locks().await.unwrap().is_empty());

        store
            .try_acquire_flight_lock(&old, now - Duration::minutes(15))
            .await
            .unwrap();
        let outcome = data
            .acquire_flight_lock(&bob, flight.id)
            .await
            .into_result()
            .unwrap();
        assert!(outcome.is_acquired());
        assert_eq!(outcome.lock().user_id, bob.id);
    }

    #[tokio::test]
    async fn test_toggle_task() {
        let (_store, data) = facade();
        let user = user();
        let flight = data
            .create_flight(&user, new_flight("N1", 0, 2))
            .await
            .into_result()
            .unwrap();
        let task = data
            .create_flight_task(
                &user,
                flight.id,
                NewFlightTask {
                    id: None,
                    description: "Order fuel".to_string(),
                    due_date: None,
                },
            )
            .await
            .into_result()
            .unwrap();
        assert!(!task.completed);

        let toggled = data.toggle_flight_task(task.id).await.into_result().unwrap();
        assert!(toggled.completed);

        let missing = data.toggle_flight_task(Uuid::new_v4()).await;
        assert_eq!(missing.code, Some(ErrorCode::NotFound));
    }

    #[tokio::test]
    async fn test_duplicate_company_is_conflict() {
        let (_store, data) = facade();
        let user = user();
        let input = NewCompany {
            id: None,
            name: "Skyline Charter".to_string(),
            contact_name: None,
            contact_email: None,
            contact_phone: None,
        };

        assert!(data.create_company(&user, input.clone()).await.is_ok());
        let duplicate = data.create_company(&user, input).await;

        assert_eq!(duplicate.code, Some(ErrorCode::Conflict));
        assert_eq!(duplicate.error.as_deref(), Some(DUPLICATE_MESSAGE));
    }

    #[tokio::test]
    async fn test_waits_for_connectivity_before_attempting() {
        let store = Arc::new(MemoryStore::new());
        let connectivity = Connectivity::new(false);
        let data = DataAccess::new(
            store.clone().into_stores(),
            retrier(connectivity.clone()),
            LockPolicy::default(),
        );

        let pending = tokio::spawn({
            let data = data.clone();
            async move { data.list_companies().await }
        });

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(store.calls(), 0);

        connectivity.set_online(true);
        let result = pending.await.unwrap();
        assert!(result.is_ok());
        assert_eq!(store.calls(), 1);
    }
}
