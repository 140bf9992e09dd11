use std::net::SocketAddr;

use medassist_core::api::{api_router, ApiContext};
use medassist_core::config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    medassist_core::init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let port: u16 = std::env::var("MEDASSIST_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let app = api_router(ApiContext::simulated());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}/api");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to install Ctrl-C handler: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}
