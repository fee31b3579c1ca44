use anyhow::Result;
use tokio::net::TcpListener;

use wedebate_session::config::Settings;
use wedebate_session::server::{create_app, AppState};
use wedebate_session::shutdown::wait_for_signal;
use wedebate_session::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    let _telemetry = init_telemetry(&settings.otel)?;
    tracing::info!(media_url = %settings.livekit.url, "Configuration loaded");

    // Create application state
    let state = AppState::new(settings.clone());
    tracing::info!("Application state initialized");

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let reason = wait_for_signal().await;
            tracing::info!(reason = reason.as_str(), "Draining in-flight requests");
        })
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
