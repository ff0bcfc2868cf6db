use axum::extract::Request;
use axum::ServiceExt;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use restblog::config::{Cli, Config};
use restblog::failure::FailurePolicy;
use restblog::routes;
use restblog::state::AppState;
use restblog::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and environment, then load config
    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    let addr = config.bind_addr()?;

    // Open the post store; it lives as long as the server does
    let posts = store::open(&config.database_url)?;

    if config.failure_policy == FailurePolicy::LogOnly {
        tracing::warn!("Failure policy is log-only: failed requests will never be answered");
    }

    let state = AppState::new(posts, config.failure_policy);
    let app = routes::app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Blog server is running on http://{}", addr);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
