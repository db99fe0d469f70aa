//! PACE HTTP server binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use pace_adapters::CompletionGateway;
use pace_config::{OPENAI_API_KEY_ENV, ProviderSettings, ServerConfig};
use pace_prompts::TemplateStore;
use pace_server::{AppState, build_router};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    pace_telemetry::init(pace_telemetry::DEFAULT_DIRECTIVES)?;

    let config = ServerConfig::from_env()?;
    if ProviderSettings::from_env().api_key().is_none() {
        warn!(
            variable = OPENAI_API_KEY_ENV,
            "no provider credential set; completions will fail until it is configured"
        );
    }

    let templates = Arc::new(TemplateStore::seeded());
    let state = AppState::new(templates, Arc::new(CompletionGateway::from_env()));
    let app = build_router(state, config.static_dir().map(PathBuf::as_path));

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("PACE server running on http://localhost:{}", config.port());
    info!(environment = config.environment(), "environment");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("PACE server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
