use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use carpool_api::app::{self, AppState, Stores};
use carpool_api::config::Config;
use carpool_api::jobs::{JobScheduler, LicenseExpirationAlertJob, PoolMetricsJob};
use carpool_api::middleware::{init_logging, init_metrics};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_logging(&config.logging);
    init_metrics()?;

    info!("Starting Campus Carpool API v{}", env!("CARGO_PKG_VERSION"));

    let stores = if config.database.is_configured() {
        let pool = persistence::db::create_pool(&persistence::db::DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            min_connections: config.database.min_connections,
            connect_timeout_secs: config.database.connect_timeout_secs,
            idle_timeout_secs: config.database.idle_timeout_secs,
        })
        .await
        .context("failed to connect to database")?;

        info!("Running database migrations...");
        persistence::db::run_migrations(&pool).await?;
        info!("Migrations completed");

        Stores::postgres(pool)
    } else {
        warn!("No database URL configured; using the in-memory store");
        Stores::in_memory()
    };

    let addr = config.socket_addr()?;
    let state = AppState::new(config, stores)?;

    let mut scheduler = JobScheduler::new();
    if let Some(pool) = state.stores.pool.clone() {
        scheduler.register(PoolMetricsJob::new(pool));
    }
    if state.config.jobs.license_alerts_enabled {
        scheduler.register(LicenseExpirationAlertJob::new(
            state.stores.users.clone(),
            state.notifications.clone(),
            state.clock.clone(),
            state.write_gate.clone(),
            state.config.jobs.license_alerts_interval_minutes,
        ));
    }
    scheduler.start();

    let app = app::create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
