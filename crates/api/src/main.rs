use anyhow::Result;
use domain::services::Connectivity;
use domain::stores::Stores;
use flight_scheduler_api::{
    app::{create_app, AppState},
    config::{Config, StorageBackend},
    jobs::{ConnectivityProbeJob, JobScheduler, LockCleanupJob},
    middleware,
};
use persistence::MemoryStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting Flight Scheduler API v{}", env!("CARGO_PKG_VERSION"));

    let stores = open_stores(&config).await?;
    let connectivity = Connectivity::default();

    let state = AppState::new(config.clone(), stores.clone(), connectivity.clone())?;

    let mut scheduler = JobScheduler::new();
    scheduler.register(ConnectivityProbeJob::new(
        stores.health.clone(),
        connectivity,
        config.connectivity.probe_interval_secs,
    ));
    scheduler.register(LockCleanupJob::new(
        state.data.clone(),
        config.locks.cleanup_interval_secs,
    ));
    scheduler.start();

    let app = create_app(state);

    let addr = config.socket_addr()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    info!("Server stopped");
    Ok(())
}

async fn open_stores(config: &Config) -> Result<Stores> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config: persistence::db::DatabaseConfig = (&config.database).into();
            let pool = persistence::db::create_pool(&db_config).await?;

            info!("Running database migrations...");
            sqlx::migrate!("../persistence/src/migrations")
                .run(&pool)
                .await?;
            info!("Migrations completed");

            Ok(persistence::postgres_stores(pool))
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()).into_stores())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
