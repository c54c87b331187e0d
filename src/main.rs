//! Timer Board - multiple persisted countdown timers behind a local HTTP API
//!
//! This is the main entry point for the timer-board application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use timer_board::{
    alerts::AlertPlayer,
    api::create_router,
    config::Config,
    state::AppState,
    storage::{JsonFileStorage, MemoryStorage, SnapshotStorage},
    tasks::CountdownDriver,
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_board={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-board server v{}", env!("CARGO_PKG_VERSION"));

    let storage: Arc<dyn SnapshotStorage> = if config.ephemeral {
        info!("Configuration: host={}, port={}, storage=memory", config.host, config.port);
        Arc::new(MemoryStorage::new())
    } else {
        let path = config.data_path();
        info!("Configuration: host={}, port={}, storage={}", config.host, config.port, path.display());
        Arc::new(JsonFileStorage::new(path))
    };

    let alerts = Arc::new(AlertPlayer::new(config.alert_repeat(), config.silent));

    // Create application state, loading any persisted timers
    let state = Arc::new(AppState::new(
        storage,
        alerts.clone(),
        config.port,
        config.host.clone(),
    ));

    // Start the countdown driver background task
    let driver = CountdownDriver::new(Arc::clone(&state));
    tokio::spawn(driver.clone().run());

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers             - List timers");
    info!("  POST   /timers             - Add a timer");
    info!("  PATCH  /timers/:id         - Edit a timer");
    info!("  DELETE /timers/:id         - Delete a timer");
    info!("  POST   /timers/:id/toggle  - Start or pause a timer");
    info!("  POST   /timers/:id/restart - Restart a timer");
    info!("  POST   /timers/:id/dismiss - Dismiss a completion alert");
    info!("  GET    /status             - Check current status");
    info!("  GET    /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to install signal handler: {}", e),
            }
        }
    }

    driver.shutdown();
    alerts.cancel_all();
    state.flush();

    info!("Server shutdown complete");
    Ok(())
}
