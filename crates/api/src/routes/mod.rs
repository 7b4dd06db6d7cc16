//! HTTP route handlers.
//!
//! Data routes answer with the facade's `{data, error, code}` body; the HTTP
//! status is derived from `code`.

pub mod audit_logs;
pub mod companies;
pub mod flights;
pub mod health;
pub mod locks;
pub mod tasks;

use axum::{http::StatusCode, Json};
use domain::models::{DataResult, ErrorCode};

/// Status plus `DataResult` body returned by every data route.
pub type DataResponse<T> = (StatusCode, Json<DataResult<T>>);

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Pairs a facade result with its HTTP status; `success` applies when it
/// carries no error.
pub fn respond<T>(result: DataResult<T>, success: StatusCode) -> DataResponse<T> {
    let status = match (&result.error, result.code) {
        (None, _) => success,
        (Some(_), Some(code)) => status_for(code),
        (Some(_), None) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(result))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use domain::services::Connectivity;
    use persistence::MemoryStore;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::app::{create_app, AppState};
    use crate::config::Config;

    pub struct TestApp {
        pub router: Router,
        pub store: Arc<MemoryStore>,
        pub state: AppState,
        pub token: String,
        pub user_id: Uuid,
    }

    impl TestApp {
        pub fn new() -> Self {
            let config = Config::load_for_test(&[
                ("storage.backend", "memory"),
                ("retry.initial_delay_ms", "1"),
                ("retry.max_delay_ms", "5"),
            ])
            .unwrap();
            let store = Arc::new(MemoryStore::new());
            let state = AppState::new(
                config,
                store.clone().into_stores(),
                Connectivity::default(),
            )
            .unwrap();
            let user_id = Uuid::new_v4();
            let token = state.jwt.issue(user_id, "dispatch@example.com", 3600).unwrap();

            Self {
                router: create_app(state.clone()),
                store,
                state,
                token,
                user_id,
            }
        }

        pub fn token_for(&self, user_id: Uuid, email: &str) -> String {
            self.state.jwt.issue(user_id, email, 3600).unwrap()
        }

        pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            self.send_as(&self.token, method, uri, body).await
        }

        pub async fn send_as(
            &self,
            token: &str,
            method: Method,
            uri: &str,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token));
            let body = match body {
                Some(json) => {
                    request = request.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };

            let response = self
                .router
                .clone()
                .oneshot(request.body(body).unwrap())
                .await
                .unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }
    }

    pub fn flight_body(tail: &str, start: &str, end: &str) -> Value {
        serde_json::json!({
            "tailNumber": tail,
            "startTime": start,
            "endTime": end,
            "startAirport": "KTEB",
            "endAirport": "KPBI",
        })
    }
}
