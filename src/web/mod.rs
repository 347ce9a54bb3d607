//! Web server: the river views over the story pipeline.

mod routes;
pub mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::neynar::NeynarClient;
use crate::story::StoryPipeline;

pub use routes::RiverEntry;

/// Shared application state. Clients are constructed once at startup and
/// reused by reference across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub neynar: NeynarClient,
    pub pipeline: Arc<StoryPipeline>,
}

/// Build the full application router for the given state.
pub fn create_app(state: AppState) -> Router {
    routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

/// Start the web server and run until the task is aborted.
///
/// # Errors
///
/// Returns an error if the clients cannot be constructed or the server
/// fails to bind.
pub async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let neynar = NeynarClient::new(&config).context("Failed to build Neynar client")?;
    let pipeline = StoryPipeline::new(&config).context("Failed to build story pipeline")?;

    let state = AppState {
        config: Arc::new(config),
        neynar,
        pipeline: Arc::new(pipeline),
    };

    let app = create_app(state);

    info!(addr = %addr, "Starting web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app).await.context("Web server error")?;

    Ok(())
}
