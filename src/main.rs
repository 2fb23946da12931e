use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use url_summarizer::{AppState, api::routes::create_router, config::Config, summarizer::Summarizer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration; a missing credential is fatal here, before any
    // request machinery exists.
    let config = Config::load()?;
    let server_addr = config.server_addr;

    let summarizer = Summarizer::new(&config);
    let app_state = AppState {
        config: Arc::new(config),
        summarizer: Arc::new(summarizer),
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!("listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
