//! HTTP surface
//!
//! Two POST endpoints in front of the media backend plus a health probe.
//! Handlers keep no mutable state; everything they share is read-only.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::downloader::tools::ToolInfo;
use crate::downloader::MediaBackend;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn MediaBackend>,
    pub tool: Arc<ToolInfo>,
}

impl AppState {
    pub fn new(backend: Arc<dyn MediaBackend>, tool: ToolInfo) -> Self {
        Self {
            backend,
            tool: Arc::new(tool),
        }
    }
}

/// Create the relay router with shared state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/info", post(handlers::info_handler))
        .route("/download", post(handlers::download_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "relay listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
