use tracing_subscriber::EnvFilter;

use grounded_search::api;
use grounded_search::config::Config;
use grounded_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Provider: {} ({})",
        config.provider.model,
        config.provider.base_url
    );
    if config.provider.credential().is_none() {
        // Only searches need the key; the page itself still works
        tracing::warn!("GEMINI_API_KEY / API_KEY not set: searches will fail until configured");
    }

    let state = AppState::new(config.clone())?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
