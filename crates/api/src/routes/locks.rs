//! Soft-lock endpoint handlers.
//!
//! Locks are advisory: they tell other editors that someone has a flight
//! open. Writes to the flight do not check them.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
};
use domain::models::{FlightLock, LockOutcome};
use uuid::Uuid;

use super::{respond, DataResponse};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Live locks across all flights.
///
/// GET /api/v1/locks
pub async fn list_locks(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<DataResponse<Vec<FlightLock>>, ApiError> {
    Ok(respond(state.data.list_flight_locks().await, StatusCode::OK))
}

/// Take or refresh the caller's lock.
///
/// POST /api/v1/flights/:id/lock
///
/// Answers 200 either way; `outcome` is `held_by_other` when another user
/// holds a live lock, and `lock` then describes their lock.
pub async fn acquire_lock(
    State(state): State<AppState>,
    UserAuth(user): UserAuth,
    flight_id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<LockOutcome>, ApiError> {
    let Path(flight_id) = flight_id?;
    Ok(respond(
        state.data.acquire_flight_lock(&user, flight_id).await,
        StatusCode::OK,
    ))
}

/// Release the caller's lock; `data` tells whether a lock was removed.
///
/// DELETE /api/v1/flights/:id/lock
pub async fn release_lock(
    State(state): State<AppState>,
    UserAuth(user): UserAuth,
    flight_id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<bool>, ApiError> {
    let Path(flight_id) = flight_id?;
    Ok(respond(
        state.data.release_flight_lock(&user, flight_id).await,
        StatusCode::OK,
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{flight_body, TestApp};
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_lock_contention_between_users() {
        let app = TestApp::new();
        let (_, body) = app
            .send(
                Method::POST,
                "/api/v1/flights",
                Some(flight_body("N9", "2026-06-01T10:00:00Z", "2026-06-01T12:00:00Z")),
            )
            .await;
        let lock_uri = format!("/api/v1/flights/{}/lock", body["data"]["id"].as_str().unwrap());
        let other_id = Uuid::new_v4();
        let other = app.token_for(other_id, "other@example.com");

        let (status, body) = app.send(Method::POST, &lock_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["outcome"], "acquired");
        assert_eq!(body["data"]["lock"]["userEmail"], "dispatch@example.com");

        let (status, body) = app.send_as(&other, Method::POST, &lock_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["outcome"], "held_by_other");
        assert_eq!(body["data"]["lock"]["userId"], json!(app.user_id));

        let (_, body) = app.send_as(&other, Method::DELETE, &lock_uri, None).await;
        assert_eq!(body["data"], false);

        let (_, body) = app.send(Method::GET, "/api/v1/locks", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = app.send(Method::DELETE, &lock_uri, None).await;
        assert_eq!(body["data"], true);

        let (_, body) = app.send_as(&other, Method::POST, &lock_uri, None).await;
        assert_eq!(body["data"]["outcome"], "acquired");
        assert_eq!(body["data"]["lock"]["userId"], json!(other_id));
    }

    #[tokio::test]
    async fn test_lock_on_missing_flight_is_not_found() {
        let app = TestApp::new();
        let uri = format!("/api/v1/flights/{}/lock", Uuid::new_v4());
        let (status, body) = app.send(Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }
}
