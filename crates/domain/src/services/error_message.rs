//! Human-readable messages for store failures.

use crate::error::StoreError;
use crate::models::ErrorCode;

pub const OVERLAP_MESSAGE: &str =
    "This flight overlaps with another active flight for the same tail number.";
pub const DUPLICATE_MESSAGE: &str = "A record with these details already exists.";
pub const AIRPORTS_MESSAGE: &str = "Departure and arrival airports must be different.";
pub const END_TIME_MESSAGE: &str = "The end time must not be before the start time.";
pub const NOT_FOUND_MESSAGE: &str = "The requested record could not be found.";
pub const REFERENCE_MESSAGE: &str = "A referenced record no longer exists.";
pub const PERMISSION_MESSAGE: &str = "You do not have permission to perform this action.";
pub const UNAVAILABLE_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";
pub const UNKNOWN_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Lowercase fragments of backend text mapped to a category and message.
/// First match wins.
const MESSAGE_TABLE: &[(&[&str], ErrorCode, &str)] = &[
    (&["dates overlap", "overlap"], ErrorCode::Conflict, OVERLAP_MESSAGE),
    (&["duplicate key", "already exists"], ErrorCode::Conflict, DUPLICATE_MESSAGE),
    (&["airports_differ", "start and end airport"], ErrorCode::Validation, AIRPORTS_MESSAGE),
    (&["end_after_start", "end time"], ErrorCode::Validation, END_TIME_MESSAGE),
    (&["foreign key"], ErrorCode::NotFound, REFERENCE_MESSAGE),
    (&["not found", "no rows"], ErrorCode::NotFound, NOT_FOUND_MESSAGE),
    (&["permission denied"], ErrorCode::PermissionDenied, PERMISSION_MESSAGE),
];

/// Maps a failure to the category and message shown to the user.
///
/// `transient` is true when the failure was classified retryable, which at
/// this point means retries were exhausted.
pub fn describe(error: &StoreError, transient: bool) -> (ErrorCode, String) {
    if let StoreError::Validation(message) = error {
        return (ErrorCode::Validation, message.clone());
    }

    let text = error.message().to_lowercase();
    for (fragments, code, message) in MESSAGE_TABLE {
        if fragments.iter().any(|f| text.contains(f)) {
            return (*code, message.to_string());
        }
    }

    match error {
        StoreError::NotFound(_) => (ErrorCode::NotFound, NOT_FOUND_MESSAGE.to_string()),
        StoreError::PermissionDenied(_) => {
            (ErrorCode::PermissionDenied, PERMISSION_MESSAGE.to_string())
        }
        _ if transient => (ErrorCode::Unavailable, UNAVAILABLE_MESSAGE.to_string()),
        _ => (ErrorCode::Unknown, UNKNOWN_MESSAGE.to_string()),
    }
}
