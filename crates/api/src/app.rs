use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use domain::services::Connectivity;
use domain::stores::Stores;
use shared::jwt::{JwtConfig, JwtError};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{audit_logs, companies, flights, health, locks, tasks};
use crate::services::DataAccess;

#[derive(Clone)]
pub struct AppState {
    pub data: DataAccess,
    pub stores: Stores,
    pub connectivity: Connectivity,
    pub jwt: Arc<JwtConfig>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the facade, retrier and token validation from configuration.
    pub fn new(config: Config, stores: Stores, connectivity: Connectivity) -> Result<Self, JwtError> {
        let jwt = JwtConfig::new(&config.auth.jwt_secret, config.auth.leeway_secs)?;
        let retrier = config.retry.retrier(connectivity.clone());
        let data = DataAccess::new(stores.clone(), retrier, config.locks.policy());

        Ok(Self {
            data,
            stores,
            connectivity,
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Data routes; each handler takes the `UserAuth` extractor.
    let api_routes = Router::new()
        // Flights
        .route(
            "/api/v1/flights",
            get(flights::list_flights).post(flights::create_flight),
        )
        .route(
            "/api/v1/flights/:id",
            get(flights::get_flight)
                .patch(flights::update_flight)
                .delete(flights::delete_flight),
        )
        .route("/api/v1/flights/:id/cancel", post(flights::cancel_flight))
        // Tasks
        .route(
            "/api/v1/flights/:id/tasks",
            get(tasks::list_flight_tasks).post(tasks::create_flight_task),
        )
        .route(
            "/api/v1/tasks/:id",
            patch(tasks::update_flight_task).delete(tasks::delete_flight_task),
        )
        .route("/api/v1/tasks/:id/toggle", post(tasks::toggle_flight_task))
        // Audit trail
        .route(
            "/api/v1/flights/:id/audit-logs",
            get(audit_logs::list_audit_logs),
        )
        // Soft locks
        .route(
            "/api/v1/flights/:id/lock",
            post(locks::acquire_lock).delete(locks::release_lock),
        )
        .route("/api/v1/locks", get(locks::list_locks))
        // Companies and their tail numbers
        .route(
            "/api/v1/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/api/v1/companies/:id",
            get(companies::get_company)
                .patch(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/api/v1/companies/:id/tails",
            get(companies::list_company_tails).post(companies::create_company_tail),
        )
        .route("/api/v1/tails/:id", delete(companies::delete_company_tail));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
