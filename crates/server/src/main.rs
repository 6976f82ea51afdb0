use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use classroom_server::api::{AppState, create_router};
use classroom_server::config::ServerConfig;
use classroom_server::db::init_pool_and_migrate;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting classroom server");
    let config = ServerConfig::load().context("failed to load server config")?;

    let db = init_pool_and_migrate(&config).await?;
    let state = Arc::new(AppState::new(db));
    let app = create_router(state).layer(cors_layer(&config.cors_allowed_origins));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("server shutdown complete");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(origin = %origin, error = %err, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, stopping server");
}
