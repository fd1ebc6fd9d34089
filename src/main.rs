use std::sync::Arc;

use anyhow::Context;
use site_search::api::{AppState, create_router};
use site_search::config::Config;
use site_search::openai::OpenAIClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = Config::from_env()?;
    let client = OpenAIClient::from_config(&config).context("Failed to create OpenAI client")?;
    log::info!(
        "using model {} at {}",
        client.model(),
        client.base_url()
    );

    let app = create_router(
        AppState::new(Arc::new(client)),
        Some(config.frontend_dist.as_path()),
    );

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    log::info!("listening on http://{addr}");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
