use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use dice_odds::api_computations::ProbabilityCalculator;
use dice_odds::env_config;
use dice_odds::server::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_config::init_tracing();
    env_config::init_rayon_threads();
    let port = env_config::server_port();
    info!("Starting dice-odds API server...");

    let calc = Arc::new(ProbabilityCalculator::new());
    let app = create_router(calc);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    info!("Server is running on port {}. Press Ctrl+C to stop.", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Stopping server...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install CTRL+C signal handler: {e}");
        std::future::pending::<()>().await;
    }
}
