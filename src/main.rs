use std::sync::Arc;

use tokio::net::TcpListener;

use greeting_service::config::{ConfigRefresher, PublishedConfig, Settings};
use greeting_service::http::HttpServer;
use greeting_service::lifecycle::Shutdown;
use greeting_service::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let levels = observability::init_logging();

    tracing::info!("greeting-service v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = Settings::from_env();
    tracing::info!(
        configmap_path = ?settings.configmap_path,
        bind_address = %settings.bind_address,
        poll_interval_ms = settings.poll_interval.as_millis() as u64,
        "Configuration loaded"
    );

    let published = Arc::new(PublishedConfig::new());
    let shutdown = Shutdown::new();

    let refresher = ConfigRefresher::new(
        settings.configmap_path.clone(),
        settings.poll_interval,
        published.clone(),
        levels,
    );
    let refresher_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        refresher.run(refresher_shutdown).await;
    });

    let listener = TcpListener::bind(&settings.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(published);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
