//! Spamgate HTTP server
//!
//! Starts an Axum web server that forwards SMS text to the classification
//! backend named by MODEL_HOST and exposes Prometheus metrics at /metrics.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;

use spamgate::backend::HttpBackendClient;
use spamgate::cli::Cli;
use spamgate::config::Config;
use spamgate::error::AppResult;
use spamgate::handlers::AppState;
use spamgate::telemetry;

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Misconfiguration aborts here, before any traffic is accepted.
    let config = Config::from_env(&cli)?.into_shared();

    telemetry::init(config.log_level());

    tracing::info!(model_host = config.model_host(), "Working with MODEL_HOST");

    let backend = Arc::new(HttpBackendClient::new(&config)?);
    let state = AppState::new(Arc::clone(&config), backend)?;
    let app = spamgate::app(state);

    let addr = SocketAddr::from((
        config
            .host()
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.port(),
    ));

    tracing::info!("Listening on {}", addr);
    tracing::info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
