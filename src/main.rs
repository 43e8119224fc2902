use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;

use study_space_api::config::Config;
use study_space_api::router::build_router;
use study_space_api::startup::{init_tracing, initialize_app, shutdown_signal, spawn_background_tasks};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (reads .env first)
    let config = Config::from_env()?;
    init_tracing(&config);
    info!("Loaded configuration for environment: {}", config.environment);

    let app_state = initialize_app(&config).await?;
    spawn_background_tasks(&app_state);

    let app = build_router(app_state);

    let addr = config.bind_address();
    info!("Starting study space API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Setup graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}
