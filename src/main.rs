// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use power_view::application::live_view::LiveView;
use power_view::application::view_runtime::{ViewEvent, ViewRuntime};
use power_view::infrastructure::config::load_viewer_config;
use power_view::infrastructure::frame_publisher::FramePublisher;
use power_view::infrastructure::http_power_source::HttpPowerSource;
use power_view::presentation::app_state::AppState;
use power_view::presentation::routes::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("power_view=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_viewer_config().context("Failed to load viewer configuration")?;

    // Create data source (infrastructure layer)
    let source = Arc::new(HttpPowerSource::new(
        config.source.base_url.clone(),
        config.source.timeout(),
    )?);

    // Create the live view and its runtime (application layer)
    let publisher = FramePublisher::new();
    let feed = publisher.feed();
    let view = LiveView::new(publisher, source, config.view.live_view_settings());
    let (runtime, handle) = ViewRuntime::new(view, config.view.refresh_interval());
    let runtime_task = tokio::spawn(runtime.run());

    // Build router (presentation layer)
    let shutdown_handle = handle.clone();
    let state = Arc::new(AppState { view: handle, feed });
    let router = create_router(state);

    // Start server
    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen))?;
    tracing::info!(
        "Starting power-view on {} (backend {})",
        addr,
        config.source.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
            }
            tracing::info!("Received Ctrl+C, shutting down...");
            // Dismounting the view ends the open client streams
            let _ = shutdown_handle.send(ViewEvent::Shutdown).await;
        })
        .await?;

    if tokio::time::timeout(Duration::from_secs(5), runtime_task).await.is_err() {
        tracing::warn!("Live view did not stop within 5s");
    }

    Ok(())
}
