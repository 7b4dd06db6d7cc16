//! In-memory store.
//!
//! Implements every store trait over a mutex-guarded map set and reproduces
//! the database constraints (checks, uniqueness, foreign keys, cascades and
//! the overlap trigger) with the same error codes and messages PostgreSQL
//! produces. Used by tests and by the `memory` storage backend.
//!
//! Failures can be injected to exercise the retry path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::models::{
    AuditLog, Company, CompanyChanges, CompanyTail, Flight, FlightChanges, FlightLock,
    FlightQuery, FlightStatus, FlightTask, FlightTaskChanges, NewAuditLog, NewCompany,
    NewCompanyTail, NewFlight, NewFlightTask,
};
use domain::stores::{
    AuditLogStore, CompanyStore, CompanyTailStore, FlightLockStore, FlightStore, FlightTaskStore,
    StoreHealth, StoreResult, Stores,
};
use domain::StoreError;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

const OVERLAP_ERROR: &str =
    "Flight dates overlap with an existing active flight for this tail number";

#[derive(Default)]
struct State {
    flights: HashMap<Uuid, Flight>,
    companies: HashMap<Uuid, Company>,
    tails: HashMap<Uuid, CompanyTail>,
    tasks: HashMap<Uuid, FlightTask>,
    locks: HashMap<Uuid, FlightLock>,
    audit_logs: Vec<AuditLog>,
}

impl State {
    /// Flight with the company name resolved, as the joined query returns it.
    fn resolved(&self, flight: &Flight) -> Flight {
        let mut flight = flight.clone();
        flight.company_name = flight
            .company_id
            .and_then(|id| self.companies.get(&id))
            .map(|c| c.name.clone());
        flight
    }

    fn check_flight(&self, flight: &Flight) -> StoreResult<()> {
        if flight.end_time < flight.start_time {
            return Err(check_violation("flights", "flights_end_after_start"));
        }
        if flight.start_airport == flight.end_airport {
            return Err(check_violation("flights", "flights_airports_differ"));
        }
        if let Some(company_id) = flight.company_id {
            if !self.companies.contains_key(&company_id) {
                return Err(foreign_key_violation("flights", "flights_company_id_fkey"));
            }
        }
        if self.flights.values().any(|other| flight.conflicts_with(other)) {
            return Err(StoreError::database(Some("23P01"), OVERLAP_ERROR));
        }
        Ok(())
    }

    fn check_company_name(&self, id: Uuid, name: &str) -> StoreResult<()> {
        if self.companies.values().any(|c| c.id != id && c.name == name) {
            return Err(unique_violation("companies_name_key"));
        }
        Ok(())
    }
}

fn check_violation(table: &str, constraint: &str) -> StoreError {
    StoreError::database(
        Some("23514"),
        format!(
            "new row for relation \"{}\" violates check constraint \"{}\"",
            table, constraint
        ),
    )
}

fn unique_violation(constraint: &str) -> StoreError {
    StoreError::database(
        Some("23505"),
        format!("duplicate key value violates unique constraint \"{}\"", constraint),
    )
}

fn foreign_key_violation(table: &str, constraint: &str) -> StoreError {
    StoreError::database(
        Some("23503"),
        format!(
            "insert or update on table \"{}\" violates foreign key constraint \"{}\"",
            table, constraint
        ),
    )
}

/// In-memory implementation of every store trait.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    failures: Mutex<VecDeque<StoreError>>,
    unreachable: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the store into the bundle the facade consumes.
    pub fn into_stores(self: Arc<Self>) -> Stores {
        Stores::from_backend(self)
    }

    /// Makes the next store call fail with `error`.
    pub async fn fail_next(&self, error: StoreError) {
        self.failures.lock().await.push_back(error);
    }

    /// Makes the next `times` store calls fail with `error`.
    pub async fn fail_times(&self, times: usize, error: StoreError) {
        let mut failures = self.failures.lock().await;
        for _ in 0..times {
            failures.push_back(error.clone());
        }
    }

    /// While unreachable every call fails with a connection error.
    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    /// Number of store calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        match self.failures.lock().await.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FlightStore for MemoryStore {
    async fn list_flights(&self, query: &FlightQuery) -> StoreResult<Vec<Flight>> {
        self.enter().await?;
        let state = self.state.lock().await;
        let mut flights: Vec<Flight> = state
            .flights
            .values()
            .filter(|f| query.matches(f))
            .map(|f| state.resolved(f))
            .collect();
        query.sort.sort(&mut flights);
        Ok(flights)
    }

    async fn find_flight(&self, id: Uuid) -> StoreResult<Option<Flight>> {
        self.enter().await?;
        let state = self.state.lock().await;
        Ok(state.flights.get(&id).map(|f| state.resolved(f)))
    }

    async fn insert_flight(
        &self,
        id: Uuid,
        created_by: Uuid,
        input: &NewFlight,
    ) -> StoreResult<Flight> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        if let Some(existing) = state.flights.get(&id) {
            if !existing.matches_submission(created_by, input) {
                return Err(StoreError::duplicate("flights_pkey"));
            }
            return Ok(state.resolved(existing));
        }

        let now = Utc::now();
        let flight = Flight {
            id,
            tail_number: input.tail_number.clone(),
            start_time: input.start_time,
            end_time: input.end_time,
            start_airport: input.start_airport.clone(),
            end_airport: input.end_airport.clone(),
            notes: input.notes.clone(),
            company_id: input.company_id,
            company_name: None,
            status: FlightStatus::Active,
            created_by,
            created_at: now,
            updated_at: now,
        };
        state.check_flight(&flight)?;
        let resolved = state.resolved(&flight);
        state.flights.insert(id, flight);
        Ok(resolved)
    }

    async fn update_flight(&self, id: Uuid, changes: &FlightChanges) -> StoreResult<Flight> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        let current = state
            .flights
            .get(&id)
            .ok_or_else(|| StoreError::not_found(format!("flight {}", id)))?;

        let mut updated = current.with_changes(changes);
        updated.company_name = None;
        updated.updated_at = Utc::now();
        state.check_flight(&updated)?;
        let resolved = state.resolved(&updated);
        state.flights.insert(id, updated);
        Ok(resolved)
    }

    async fn delete_flight(&self, id: Uuid) -> StoreResult<()> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        if state.flights.remove(&id).is_some() {
            state.tasks.retain(|_, t| t.flight_id != id);
            state.audit_logs.retain(|log| log.flight_id != id);
            state.locks.remove(&id);
        }
        Ok(())
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn list_companies(&self) -> StoreResult<Vec<Company>> {
        self.enter().await?;
        let state = self.state.lock().await;
        let mut companies: Vec<Company> = state.companies.values().cloned().collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(companies)
    }

    async fn find_company(&self, id: Uuid) -> StoreResult<Option<Company>> {
        self.enter().await?;
        Ok(self.state.lock().await.companies.get(&id).cloned())
    }

    async fn insert_company(
        &self,
        id: Uuid,
        created_by: Uuid,
        input: &NewCompany,
    ) -> StoreResult<Company> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        if let Some(existing) = state.companies.get(&id) {
            return Ok(existing.clone());
        }
        state.check_company_name(id, &input.name)?;

        let now = Utc::now();
        let company = Company {
            id,
            name: input.name.clone(),
            contact_name: input.contact_name.clone(),
            contact_email: input.contact_email.clone(),
            contact_phone: input.contact_phone.clone(),
            created_by,
            created_at: now,
            updated_at: now,
        };
        state.companies.insert(id, company.clone());
        Ok(company)
    }

    async fn update_company(&self, id: Uuid, changes: &CompanyChanges) -> StoreResult<Company> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        let current = state
            .companies
            .get(&id)
            .ok_or_else(|| StoreError::not_found(format!("company {}", id)))?;

        let mut updated = current.with_changes(changes);
        updated.updated_at = Utc::now();
        state.check_company_name(id, &updated.name)?;
        state.companies.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_company(&self, id: Uuid) -> StoreResult<()> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        if state.companies.remove(&id).is_some() {
            state.tails.retain(|_, t| t.company_id != id);
            for flight in state.flights.values_mut() {
                if flight.company_id == Some(id) {
                    flight.company_id = None;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CompanyTailStore for MemoryStore {
    async fn list_company_tails(&self, company_id: Uuid) -> StoreResult<Vec<CompanyTail>> {
        self.enter().await?;
        let state = self.state.lock().await;
        let mut tails: Vec<CompanyTail> = state
            .tails
            .values()
            .filter(|t| t.company_id == company_id)
            .cloned()
            .collect();
        tails.sort_by(|a, b| a.tail_number.cmp(&b.tail_number));
        Ok(tails)
    }

    async fn insert_company_tail(
        &self,
        id: Uuid,
        company_id: Uuid,
        input: &NewCompanyTail,
    ) -> StoreResult<CompanyTail> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        if let Some(existing) = state.tails.get(&id) {
            return Ok(existing.clone());
        }
        if !state.companies.contains_key(&company_id) {
            return Err(foreign_key_violation(
                "company_tails",
                "company_tails_company_id_fkey",
            ));
        }
        if state
            .tails
            .values()
            .any(|t| t.company_id == company_id && t.tail_number == input.tail_number)
        {
            return Err(unique_violation("company_tails_company_tail_key"));
        }

        let tail = CompanyTail {
            id,
            company_id,
            tail_number: input.tail_number.clone(),
            created_at: Utc::now(),
        };
        state.tails.insert(id, tail.clone());
        Ok(tail)
    }

    async fn delete_company_tail(&self, id: Uuid) -> StoreResult<()> {
        self.enter().await?;
        self.state.lock().await.tails.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl FlightTaskStore for MemoryStore {
    async fn list_flight_tasks(&self, flight_id: Uuid) -> StoreResult<Vec<FlightTask>> {
        self.enter().await?;
        let state = self.state.lock().await;
        let mut tasks: Vec<FlightTask> = state
            .tasks
            .values()
            .filter(|t| t.flight_id == flight_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn find_flight_task(&self, id: Uuid) -> StoreResult<Option<FlightTask>> {
        self.enter().await?;
        Ok(self.state.lock().await.tasks.get(&id).cloned())
    }

    async fn insert_flight_task(
        &self,
        id: Uuid,
        flight_id: Uuid,
        created_by: Uuid,
        input: &NewFlightTask,
    ) -> StoreResult<FlightTask> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        if let Some(existing) = state.tasks.get(&id) {
            return Ok(existing.clone());
        }
        if !state.flights.contains_key(&flight_id) {
            return Err(foreign_key_violation(
                "flight_tasks",
                "flight_tasks_flight_id_fkey",
            ));
        }

        let task = FlightTask {
            id,
            flight_id,
            description: input.description.trim().to_string(),
            completed: false,
            due_date: input.due_date,
            created_by,
            created_at: Utc::now(),
        };
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn update_flight_task(
        &self,
        id: Uuid,
        changes: &FlightTaskChanges,
    ) -> StoreResult<FlightTask> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        let current = state
            .tasks
            .get(&id)
            .ok_or_else(|| StoreError::not_found(format!("flight task {}", id)))?;

        let updated = current.with_changes(changes);
        state.tasks.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_flight_task(&self, id: Uuid) -> StoreResult<()> {
        self.enter().await?;
        self.state.lock().await.tasks.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl FlightLockStore for MemoryStore {
    async fn list_flight_locks(&self) -> StoreResult<Vec<FlightLock>> {
        self.enter().await?;
        let state = self.state.lock().await;
        let mut locks: Vec<FlightLock> = state.locks.values().cloned().collect();
        locks.sort_by(|a, b| a.locked_at.cmp(&b.locked_at));
        Ok(locks)
    }

    async fn find_flight_lock(&self, flight_id: Uuid) -> StoreResult<Option<FlightLock>> {
        self.enter().await?;
        Ok(self.state.lock().await.locks.get(&flight_id).cloned())
    }

    async fn try_acquire_flight_lock(
        &self,
        lock: &FlightLock,
        stale_before: DateTime<Utc>,
    ) -> StoreResult<Option<FlightLock>> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        if !state.flights.contains_key(&lock.flight_id) {
            return Err(foreign_key_violation(
                "flight_locks",
                "flight_locks_flight_id_fkey",
            ));
        }
        if let Some(existing) = state.locks.get(&lock.flight_id) {
            if existing.user_id != lock.user_id && existing.locked_at > stale_before {
                return Ok(None);
            }
        }
        state.locks.insert(lock.flight_id, lock.clone());
        Ok(Some(lock.clone()))
    }

    async fn release_flight_lock(&self, flight_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        match state.locks.get(&flight_id) {
            Some(lock) if lock.user_id == user_id => {
                state.locks.remove(&flight_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_expired_flight_locks(&self, stale_before: DateTime<Utc>) -> StoreResult<u64> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        let before = state.locks.len();
        state.locks.retain(|_, lock| lock.locked_at > stale_before);
        Ok((before - state.locks.len()) as u64)
    }
}

#[async_trait]
impl AuditLogStore for MemoryStore {
    async fn list_audit_logs(&self, flight_id: Uuid) -> StoreResult<Vec<AuditLog>> {
        self.enter().await?;
        let state = self.state.lock().await;
        // Newest first; later inserts win ties.
        let mut logs: Vec<AuditLog> = state
            .audit_logs
            .iter()
            .rev()
            .filter(|log| log.flight_id == flight_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(logs)
    }

    async fn insert_audit_log(&self, input: &NewAuditLog) -> StoreResult<AuditLog> {
        self.enter().await?;
        let mut state = self.state.lock().await;
        if let Some(existing) = state.audit_logs.iter().find(|log| log.id == input.id) {
            return Ok(existing.clone());
        }
        if !state.flights.contains_key(&input.flight_id) {
            return Err(foreign_key_violation(
                "audit_logs",
                "audit_logs_flight_id_fkey",
            ));
        }

        let log = AuditLog {
            id: input.id,
            flight_id: input.flight_id,
            user_id: input.user_id,
            action: input.action,
            changes: input.changes.clone(),
            created_at: Utc::now(),
        };
        state.audit_logs.push(log.clone());
        Ok(log)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.enter().await
    }
}
