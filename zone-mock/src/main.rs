//! zone-mock — standalone in-memory zones service
//!
//! Point a client at it with `CTP_API_URL=http://localhost:8090` to run the
//! fixtures without a real project.

use std::sync::Arc;

use zone_mock::{AppState, MockConfig, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zone_mock=info,tower_http=info".into()),
        )
        .init();

    let config = MockConfig::from_env()?;
    if config.token.is_some() {
        tracing::info!("Bearer token required on every request");
    }

    let state = Arc::new(AppState::new(config.token.clone()));
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("zone-mock listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("zone-mock stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
