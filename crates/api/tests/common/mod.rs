//! Common test utilities for integration tests.
//!
//! These tests run against a real PostgreSQL database named by
//! `TEST_DATABASE_URL`. They are `#[ignore]`d by default; run them with
//! `cargo test --test flights_integration -- --ignored`.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use domain::services::Connectivity;
use flight_scheduler_api::{
    app::{create_app, AppState},
    config::{
        AuthConfig, Config, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig,
        StorageBackend, StorageConfig,
    },
};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Connects to the test database and applies migrations.
pub async fn test_pool() -> PgPool {
    let database_url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must point at a PostgreSQL test database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn test_config(database_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        },
        storage: StorageConfig {
            backend: StorageBackend::Postgres,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: Vec::new(),
        },
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            leeway_secs: 30,
        },
        retry: Default::default(),
        locks: Default::default(),
        connectivity: Default::default(),
    }
}

/// Router over the PostgreSQL stores plus a token for a fresh user.
pub struct TestServer {
    pub router: Router,
    pub state: AppState,
    pub token: String,
    pub user_id: Uuid,
}

impl TestServer {
    pub fn new(pool: PgPool) -> Self {
        let url = std::env::var("TEST_DATABASE_URL").unwrap_or_default();
        let state = AppState::new(
            test_config(&url),
            persistence::postgres_stores(pool),
            Connectivity::default(),
        )
        .expect("valid test config");
        let user_id = Uuid::new_v4();
        let token = state
            .jwt
            .issue(user_id, "integration@example.com", 3600)
            .expect("token");

        Self {
            router: create_app(state.clone()),
            state,
            token,
            user_id,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
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

/// A tail number no other test run uses.
pub fn unique_tail() -> String {
    let suffix = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("T{}", &suffix[..8])
}
