//! Flight domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use shared::validation::normalize_code;

// ============================================================================
// Flight Status Enum
// ============================================================================

/// Status of a flight. Cancellation is a status change, never a deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    #[default]
    Active,
    Cancelled,
}

impl FlightStatus {
    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Active => "active",
            FlightStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FlightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(FlightStatus::Active),
            "cancelled" => Ok(FlightStatus::Cancelled),
            _ => Err(format!(
                "Invalid flight status: {}. Must be one of: active, cancelled",
                s
            )),
        }
    }
}

// ============================================================================
// Core Model
// ============================================================================

/// A scheduled aircraft movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: Uuid,
    pub tail_number: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_airport: String,
    pub end_airport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    /// Resolved from the company at read time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub status: FlightStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flight {
    pub fn is_active(&self) -> bool {
        self.status == FlightStatus::Active
    }

    /// Whether two flights would violate the tail-number overlap rule.
    ///
    /// Only distinct active flights on the same tail conflict; intervals are
    /// half-open so back-to-back legs are allowed.
    pub fn conflicts_with(&self, other: &Flight) -> bool {
        self.id != other.id
            && self.is_active()
            && other.is_active()
            && self.tail_number.eq_ignore_ascii_case(&other.tail_number)
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }

    /// Whether this row is what `created_by` submitting `input` would have
    /// written. Times match within a microsecond, the precision PostgreSQL
    /// rounds to.
    pub fn matches_submission(&self, created_by: Uuid, input: &NewFlight) -> bool {
        self.created_by == created_by
            && self.tail_number.eq_ignore_ascii_case(&input.tail_number)
            && same_instant(self.start_time, input.start_time)
            && same_instant(self.end_time, input.end_time)
            && self.start_airport.eq_ignore_ascii_case(&input.start_airport)
            && self.end_airport.eq_ignore_ascii_case(&input.end_airport)
            && self.company_id == input.company_id
    }

    /// Returns a copy of this flight with the submitted changes applied.
    pub fn with_changes(&self, changes: &FlightChanges) -> Flight {
        let mut updated = self.clone();
        if let Some(ref tail_number) = changes.tail_number {
            updated.tail_number = normalize_code(tail_number);
        }
        if let Some(start_time) = changes.start_time {
            updated.start_time = start_time;
        }
        if let Some(end_time) = changes.end_time {
            updated.end_time = end_time;
        }
        if let Some(ref start_airport) = changes.start_airport {
            updated.start_airport = normalize_code(start_airport);
        }
        if let Some(ref end_airport) = changes.end_airport {
            updated.end_airport = normalize_code(end_airport);
        }
        if let Some(ref notes) = changes.notes {
            updated.notes = normalize_notes(notes);
        }
        if let Some(company_id) = changes.company_id {
            if updated.company_id != Some(company_id) {
                updated.company_name = None;
            }
            updated.company_id = Some(company_id);
        }
        if let Some(status) = changes.status {
            updated.status = status;
        }
        updated
    }
}

fn same_instant(stored: DateTime<Utc>, submitted: DateTime<Utc>) -> bool {
    (stored - submitted).num_microseconds() == Some(0)
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request payload for creating a flight.
///
/// `id` may be supplied by the client; it identifies the logical write so a
/// create that is retried after a lost acknowledgement does not duplicate.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFlight {
    #[serde(default)]
    pub id: Option<Uuid>,

    #[validate(custom(function = "shared::validation::validate_tail_number"))]
    pub tail_number: String,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,

    #[validate(custom(function = "shared::validation::validate_airport_code"))]
    pub start_airport: String,

    #[validate(custom(function = "shared::validation::validate_airport_code"))]
    pub end_airport: String,

    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,

    pub company_id: Option<Uuid>,
}

impl NewFlight {
    /// Field validation plus the cross-field schedule rules.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        add_schedule_errors(
            &mut errors,
            self.start_time,
            self.end_time,
            &self.start_airport,
            &self.end_airport,
        );
        into_result(errors)
    }

    /// Uppercases codes and drops blank notes.
    pub fn normalized(mut self) -> Self {
        self.tail_number = normalize_code(&self.tail_number);
        self.start_airport = normalize_code(&self.start_airport);
        self.end_airport = normalize_code(&self.end_airport);
        self.notes = self.notes.as_deref().and_then(normalize_notes);
        self
    }
}

/// Request payload for updating a flight. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FlightChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "shared::validation::validate_tail_number"))]
    pub tail_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "shared::validation::validate_airport_code"))]
    pub start_airport: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "shared::validation::validate_airport_code"))]
    pub end_airport: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FlightStatus>,
}

impl FlightChanges {
    pub fn cancel() -> Self {
        Self {
            status: Some(FlightStatus::Cancelled),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Uppercases codes and trims notes. Blank notes stay present so they
    /// clear the stored value.
    pub fn normalized(mut self) -> Self {
        self.tail_number = self.tail_number.as_deref().map(normalize_code);
        self.start_airport = self.start_airport.as_deref().map(normalize_code);
        self.end_airport = self.end_airport.as_deref().map(normalize_code);
        self.notes = self.notes.map(|n| n.trim().to_string());
        self
    }

    /// Field validation plus schedule rules evaluated against the merged flight.
    pub fn check_against(&self, current: &Flight) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        let merged = current.with_changes(self);
        add_schedule_errors(
            &mut errors,
            merged.start_time,
            merged.end_time,
            &merged.start_airport,
            &merged.end_airport,
        );
        into_result(errors)
    }
}

/// Sort order for flight listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightSort {
    #[default]
    StartTimeAsc,
    StartTimeDesc,
    CreatedAtDesc,
}

impl FlightSort {
    /// SQL ORDER BY clause; `id` breaks ties so repeated reads are stable.
    pub fn order_by(&self) -> &'static str {
        match self {
            FlightSort::StartTimeAsc => "f.start_time ASC, f.id ASC",
            FlightSort::StartTimeDesc => "f.start_time DESC, f.id ASC",
            FlightSort::CreatedAtDesc => "f.created_at DESC, f.id ASC",
        }
    }

    /// Sorts flights in memory using the same ordering as `order_by`.
    pub fn sort(&self, flights: &mut [Flight]) {
        match self {
            FlightSort::StartTimeAsc => {
                flights.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)))
            }
            FlightSort::StartTimeDesc => {
                flights.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(a.id.cmp(&b.id)))
            }
            FlightSort::CreatedAtDesc => {
                flights.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)))
            }
        }
    }
}

/// Equality filters applied by the store when listing flights.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightQuery {
    pub company_id: Option<Uuid>,
    pub tail_number: Option<String>,
    pub status: Option<FlightStatus>,
    #[serde(default)]
    pub sort: FlightSort,
}

impl FlightQuery {
    /// Whether a flight passes the equality filters.
    pub fn matches(&self, flight: &Flight) -> bool {
        if let Some(company_id) = self.company_id {
            if flight.company_id != Some(company_id) {
                return false;
            }
        }
        if let Some(ref tail_number) = self.tail_number {
            if !flight.tail_number.eq_ignore_ascii_case(tail_number.trim()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if flight.status != status {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

fn normalize_notes(notes: &str) -> Option<String> {
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn add_schedule_errors(
    errors: &mut ValidationErrors,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    start_airport: &str,
    end_airport: &str,
) {
    if end_time < start_time {
        let mut err = ValidationError::new("end_after_start");
        err.message = Some("The end time must not be before the start time".into());
        errors.add("end_time", err);
    }
    if normalize_code(start_airport) == normalize_code(end_airport) {
        let mut err = ValidationError::new("airports_differ");
        err.message = Some("Departure and arrival airports must be different".into());
        errors.add("end_airport", err);
    }
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn flight(tail: &str, start_hour: i64, end_hour: i64) -> Flight {
        let base = DateTime::parse_from_rfc3339("2026-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Flight {
            id: Uuid::new_v4(),
            tail_number: tail.to_string(),
            start_time: base + Duration::hours(start_hour),
            end_time: base + Duration::hours(end_hour),
            start_airport: "LAX".to_string(),
            end_airport: "SFO".to_string(),
            notes: None,
            company_id: None,
            company_name: None,
            status: FlightStatus::Active,
            created_by: Uuid::new_v4(),
            created_at: base,
            updated_at: base,
        }
    }

    fn new_flight() -> NewFlight {
        let start = Utc::now();
        NewFlight {
            id: None,
            tail_number: "n123ab".to_string(),
            start_time: start,
            end_time: start + Duration::hours(2),
            start_airport: "lax".to_string(),
            end_airport: "sfo".to_string(),
            notes: Some("   ".to_string()),
            company_id: None,
        }
    }

    #[test]
    fn test_matches_submission() {
        let stored = flight("N123AB", 0, 2);
        let input = NewFlight {
            id: Some(stored.id),
            tail_number: "n123ab".to_string(),
            start_time: stored.start_time,
            end_time: stored.end_time,
            start_airport: "lax".to_string(),
            end_airport: "sfo".to_string(),
            notes: None,
            company_id: None,
        };
        assert!(stored.matches_submission(stored.created_by, &input));
        assert!(!stored.matches_submission(Uuid::new_v4(), &input));

        let rounded = NewFlight {
            start_time: stored.start_time + Duration::nanoseconds(400),
            ..input.clone()
        };
        assert!(stored.matches_submission(stored.created_by, &rounded));

        let other_tail = NewFlight {
            tail_number: "N999".to_string(),
            ..input.clone()
        };
        assert!(!stored.matches_submission(stored.created_by, &other_tail));

        let later = NewFlight {
            end_time: stored.end_time + Duration::minutes(30),
            ..input
        };
        assert!(!stored.matches_submission(stored.created_by, &later));
    }

    #[test]
    fn test_flight_status_round_trip() {
        assert_eq!("active".parse::<FlightStatus>().unwrap(), FlightStatus::Active);
        assert_eq!(
            "CANCELLED".parse::<FlightStatus>().unwrap(),
            FlightStatus::Cancelled
        );
        assert!("landed".parse::<FlightStatus>().is_err());
        assert_eq!(FlightStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_conflicts_with_overlapping_same_tail() {
        let a = flight("N1", 0, 4);
        let b = flight("N1", 2, 6);
        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
    }

    #[test]
    fn test_back_to_back_flights_do_not_conflict() {
        let a = flight("N1", 0, 4);
        let b = flight("N1", 4, 6);
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn test_different_tail_or_cancelled_do_not_conflict() {
        let a = flight("N1", 0, 4);
        let b = flight("N2", 1, 3);
        assert!(!a.conflicts_with(&b));

        let mut c = flight("N1", 1, 3);
        c.status = FlightStatus::Cancelled;
        assert!(!a.conflicts_with(&c));
    }

    #[test]
    fn test_flight_never_conflicts_with_itself() {
        let a = flight("N1", 0, 4);
        assert!(!a.conflicts_with(&a.clone()));
    }

    #[test]
    fn test_new_flight_check_valid() {
        assert!(new_flight().check().is_ok());
    }

    #[test]
    fn test_new_flight_same_airports_rejected() {
        let mut input = new_flight();
        input.end_airport = "LAX".to_string();
        let errors = input.check().unwrap_err();
        assert!(errors.field_errors().contains_key("end_airport"));
    }

    #[test]
    fn test_new_flight_end_before_start_rejected() {
        let mut input = new_flight();
        input.end_time = input.start_time - Duration::minutes(1);
        let errors = input.check().unwrap_err();
        assert!(errors.field_errors().contains_key("end_time"));
    }

    #[test]
    fn test_new_flight_zero_duration_allowed() {
        let mut input = new_flight();
        input.end_time = input.start_time;
        assert!(input.check().is_ok());
    }

    #[test]
    fn test_new_flight_invalid_codes() {
        let mut input = new_flight();
        input.tail_number = "#".to_string();
        input.start_airport = "L".to_string();
        let errors = input.check().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("tail_number"));
        assert!(fields.contains_key("start_airport"));
    }

    #[test]
    fn test_new_flight_normalized() {
        let input = new_flight().normalized();
        assert_eq!(input.tail_number, "N123AB");
        assert_eq!(input.start_airport, "LAX");
        assert_eq!(input.end_airport, "SFO");
        assert!(input.notes.is_none());
    }

    #[test]
    fn test_with_changes_applies_only_present_fields() {
        let current = flight("N1", 0, 4);
        let changes = FlightChanges {
            notes: Some("Fuel stop".to_string()),
            end_airport: Some("sea".to_string()),
            ..Default::default()
        };
        let merged = current.with_changes(&changes);
        assert_eq!(merged.notes.as_deref(), Some("Fuel stop"));
        assert_eq!(merged.end_airport, "SEA");
        assert_eq!(merged.tail_number, current.tail_number);
        assert_eq!(merged.start_time, current.start_time);
    }

    #[test]
    fn test_changes_checked_against_current() {
        let current = flight("N1", 0, 4);
        let changes = FlightChanges {
            end_time: Some(current.start_time - Duration::hours(1)),
            ..Default::default()
        };
        assert!(changes.check_against(&current).is_err());

        let changes = FlightChanges {
            end_airport: Some("LAX".to_string()),
            ..Default::default()
        };
        assert!(changes.check_against(&current).is_err());
    }

    #[test]
    fn test_cancel_changes() {
        let changes = FlightChanges::cancel();
        assert_eq!(changes.status, Some(FlightStatus::Cancelled));
        assert!(!changes.is_empty());
        assert!(FlightChanges::default().is_empty());
    }

    #[test]
    fn test_changes_serialize_only_submitted_fields() {
        let changes = FlightChanges {
            notes: Some("Crew swap".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json, serde_json::json!({ "notes": "Crew swap" }));
    }

    #[test]
    fn test_query_matches() {
        let mut f = flight("N1", 0, 4);
        let company = Uuid::new_v4();
        f.company_id = Some(company);

        assert!(FlightQuery::default().matches(&f));
        assert!(FlightQuery {
            company_id: Some(company),
            tail_number: Some("n1".to_string()),
            status: Some(FlightStatus::Active),
            ..Default::default()
        }
        .matches(&f));
        assert!(!FlightQuery {
            status: Some(FlightStatus::Cancelled),
            ..Default::default()
        }
        .matches(&f));
        assert!(!FlightQuery {
            company_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
        .matches(&f));
    }

    #[test]
    fn test_sort_start_time_asc() {
        let mut flights = vec![flight("N1", 5, 6), flight("N2", 1, 2), flight("N3", 3, 4)];
        FlightSort::StartTimeAsc.sort(&mut flights);
        let tails: Vec<_> = flights.iter().map(|f| f.tail_number.as_str()).collect();
        assert_eq!(tails, vec!["N2", "N3", "N1"]);
    }

    #[test]
    fn test_sort_default_is_start_time_asc() {
        assert_eq!(FlightSort::default(), FlightSort::StartTimeAsc);
        assert!(FlightSort::default().order_by().starts_with("f.start_time ASC"));
    }
}
