//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Aircraft registration: leading letter or digit, then letters, digits or hyphens.
    static ref TAIL_NUMBER_RE: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9-]{1,9}$").unwrap();
    /// IATA (3 letters) or ICAO (4 letters) airport code.
    static ref AIRPORT_CODE_RE: Regex = Regex::new(r"^[A-Z]{3,4}$").unwrap();
}

/// Normalizes a code-like value (tail number, airport code) for storage and comparison.
pub fn normalize_code(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Validates an aircraft tail number (e.g. `N123AB`, `G-ABCD`).
pub fn validate_tail_number(tail_number: &str) -> Result<(), ValidationError> {
    if TAIL_NUMBER_RE.is_match(&normalize_code(tail_number)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("tail_number_format");
        err.message = Some(
            "Tail number must be 2-10 characters of letters, digits or hyphens".into(),
        );
        Err(err)
    }
}

/// Validates an airport code (3 or 4 letters).
pub fn validate_airport_code(code: &str) -> Result<(), ValidationError> {
    if AIRPORT_CODE_RE.is_match(&normalize_code(code)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("airport_code_format");
        err.message = Some("Airport code must be 3 or 4 letters".into());
        Err(err)
    }
}

/// Validates that a text value is not only whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
