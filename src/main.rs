use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phishguard_backend_core::{app_config, create_router, initialize_app_state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = app_config::config();

    // Initialize tracing; RUST_LOG reaches the filter through the config
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.rust_log)
                .unwrap_or_else(|_| app_config::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting PhishGuard Backend on {} ({})",
        config.bind_address, config.environment
    );
    if config.is_production() && config.allows_any_origin() {
        warn!("CORS allows any origin in production");
    }

    let state = initialize_app_state()
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize application state")?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
