//! Focus Timer - A state-managed HTTP server driving a pomodoro countdown
//!
//! This is the main entry point for the focus-timer application.

use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    api::create_router, config::Config, state::AppState, tasks::ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "focus_timer={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, presets={}m/{}m/{}m",
        config.host, config.port, config.focus, config.short, config.long
    );

    // Create application state with the configured presets
    let state = AppState::new(config.port, config.host.clone(), config.presets());

    // Start the ticker background task that drives the countdown
    let ticker_state = std::sync::Arc::clone(&state);
    tokio::spawn(async move {
        ticker_task(ticker_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start       - Start or resume the countdown");
    info!("  POST /pause       - Pause the countdown");
    info!("  POST /reset       - Restore the full session duration");
    info!("  POST /mode/:mode  - Select a preset mode (focus, short, long)");
    info!("  PUT  /presets     - Replace the preset minute values");
    info!("  GET  /status      - Check current timer status");
    info!("  GET  /health      - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
