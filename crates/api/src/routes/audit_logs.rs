//! Audit trail endpoint handler.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
};
use domain::models::AuditLog;
use uuid::Uuid;

use super::{respond, DataResponse};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Audit entries for a flight, newest first.
///
/// GET /api/v1/flights/:id/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    _auth: UserAuth,
    flight_id: Result<Path<Uuid>, PathRejection>,
) -> Result<DataResponse<Vec<AuditLog>>, ApiError> {
    let Path(flight_id) = flight_id?;
    Ok(respond(
        state.data.list_audit_logs(flight_id).await,
        StatusCode::OK,
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{flight_body, TestApp};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_audit_trail_newest_first() {
        let app = TestApp::new();
        let (_, body) = app
            .send(
                Method::POST,
                "/api/v1/flights",
                Some(flight_body("N88", "2026-06-01T10:00:00Z", "2026-06-01T12:00:00Z")),
            )
            .await;
        let id = body["data"]["id"].as_str().unwrap().to_string();
        let previous = body["data"].clone();

        app.send(
            Method::PATCH,
            &format!("/api/v1/flights/{}", id),
            Some(json!({"notes": "Crew swap"})),
        )
        .await;

        let (status, body) = app
            .send(Method::GET, &format!("/api/v1/flights/{}/audit-logs", id), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let logs = body["data"].as_array().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0]["action"], "update");
        assert_eq!(logs[0]["changes"]["previous"], previous);
        assert_eq!(logs[0]["changes"]["new"], json!({"notes": "Crew swap"}));
        assert_eq!(logs[1]["action"], "create");
        assert_eq!(logs[1]["userId"], json!(app.user_id));
    }
}
