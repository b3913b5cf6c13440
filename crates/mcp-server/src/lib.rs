//! Math MCP tool server.
//!
//! Exposes the `add_numbers` tool over MCP streamable HTTP at [`MCP_PATH`],
//! plus a plain `GET /health` liveness probe.

mod error;
mod tools;

pub use error::{Error, Result};
pub use tools::{AddNumbersParams, MathServer};

use axum::{Router, routing::get};
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio::net::TcpListener;
use tracing::info;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 13744;
pub const MCP_PATH: &str = "/mcp";

/// Build the HTTP app: `/health` and the MCP endpoint.
pub fn router() -> Router {
    let mcp = StreamableHttpService::new(
        || Ok(MathServer::new()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/health", get(health))
        .nest_service(MCP_PATH, mcp)
}

async fn health() -> &'static str {
    "OK"
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("math server listening on http://{}{MCP_PATH}", listener.local_addr()?);

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("math server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}
