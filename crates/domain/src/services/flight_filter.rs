//! In-memory filtering of listed flights (search box and date window).

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::Flight;

/// Client-side style filters applied after the store query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightFilter {
    /// Case-insensitive text matched against tail, airports, company and notes.
    pub search: Option<String>,
    /// Keep flights that end at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Keep flights that start before this instant.
    pub to: Option<DateTime<Utc>>,
}

impl FlightFilter {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.from.is_none()
            && self.to.is_none()
    }

    pub fn matches(&self, flight: &Flight) -> bool {
        if let Some(from) = self.from {
            if flight.end_time < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if flight.start_time >= to {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                [
                    Some(flight.tail_number.as_str()),
                    Some(flight.start_airport.as_str()),
                    Some(flight.end_airport.as_str()),
                    flight.company_name.as_deref(),
                    flight.notes.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }

    /// Keeps matching flights, preserving order.
    pub fn apply(&self, flights: Vec<Flight>) -> Vec<Flight> {
        if self.is_empty() {
            return flights;
        }
        flights.into_iter().filter(|f| self.matches(f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlightStatus;
    use chrono::Duration;
    use uuid::Uuid;

    fn flight(tail: &str, from: &str, to: &str, start_hour: i64) -> Flight {
        let base = DateTime::parse_from_rfc3339("2026-05-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Flight {
            id: Uuid::new_v4(),
            tail_number: tail.to_string(),
            start_time: base + Duration::hours(start_hour),
            end_time: base + Duration::hours(start_hour + 2),
            start_airport: from.to_string(),
            end_airport: to.to_string(),
            notes: Some("VIP charter".to_string()),
            company_id: None,
            company_name: Some("Acme Air".to_string()),
            status: FlightStatus::Active,
            created_by: Uuid::new_v4(),
            created_at: base,
            updated_at: base,
        }
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let flights = vec![flight("N1", "LAX", "SFO", 0), flight("N2", "JFK", "BOS", 5)];
        assert_eq!(FlightFilter::default().apply(flights.clone()), flights);
    }

    #[test]
    fn test_search_matches_fields_case_insensitively() {
        let flights = vec![flight("N1", "LAX", "SFO", 0), flight("N2", "JFK", "BOS", 5)];

        let by_airport = FlightFilter {
            search: Some("jfk".to_string()),
            ..Default::default()
        };
        let result = by_airport.apply(flights.clone());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].tail_number, "N2");

        let by_company = FlightFilter {
            search: Some("acme".to_string()),
            ..Default::default()
        };
        assert_eq!(by_company.apply(flights.clone()).len(), 2);

        let by_notes = FlightFilter {
            search: Some("vip".to_string()),
            ..Default::default()
        };
        assert_eq!(by_notes.apply(flights).len(), 2);
    }

    #[test]
    fn test_date_window() {
        let early = flight("N1", "LAX", "SFO", 0); // 00:00-02:00
        let late = flight("N2", "JFK", "BOS", 10); // 10:00-12:00
        let base = early.start_time;

        let window = FlightFilter {
            from: Some(base + Duration::hours(1)),
            to: Some(base + Duration::hours(5)),
            ..Default::default()
        };
        let result = window.apply(vec![early.clone(), late]);
        assert_eq!(result, vec![early]);
    }
}
