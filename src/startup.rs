//! Application startup and initialization logic
//!
//! Installs logging and metrics, loads the dataset and builds the `AppState`.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::{Config, LogFormat};
use crate::services::SpaceDataset;

/// How often histogram buckets are drained by the Prometheus recorder
const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `LOG_LEVEL` when set.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.log_level)));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Load the dataset and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    info!("Starting study space API ({})", config.environment);

    // Initialize Prometheus metrics exporter
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    info!("Prometheus metrics initialized");

    let dataset = SpaceDataset::load(&config.data_path)
        .with_context(|| format!("Failed to load dataset from {}", config.data_path))?;
    metrics::gauge!("dataset_buildings_loaded").set(dataset.len() as f64);

    if let Some(time) = config.current_time_override {
        info!("Using fixed clock {}", time);
    }
    info!(
        "Rate limit: {} requests per {}s",
        config.rate_limit.max_requests, config.rate_limit.window_secs
    );

    Ok(AppState::new(config.clone(), dataset, metrics_handle))
}

/// Spawn background tasks.
pub fn spawn_background_tasks(app_state: &AppState) {
    let rate_limiter = app_state.rate_limiter.clone();
    let prune_every = rate_limiter.config().window();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(prune_every);
        loop {
            interval.tick().await;
            rate_limiter.prune();
            metrics::gauge!("rate_limit_tracked_clients").set(rate_limiter.tracked_clients() as f64);
        }
    });

    let metrics_handle = app_state.metrics_handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(METRICS_UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            metrics_handle.run_upkeep();
        }
    });

    info!("Background tasks started");
}

/// Wait for shutdown signal.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
