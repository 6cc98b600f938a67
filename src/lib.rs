pub mod config;
pub mod downloader;
pub mod logging;
pub mod server;

use std::sync::Arc;

use config::Config;
use downloader::{ToolManager, YtDlpBackend};
use server::AppState;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Tool detection failed: {0}")]
    Detection(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the shared state from config. Detection shells out, so it runs on
/// the blocking pool.
pub async fn build_state(config: &Config) -> Result<AppState, RelayError> {
    let override_path = config.ytdlp_path.clone();
    let tool = tokio::task::spawn_blocking(move || ToolManager::new(override_path).detect())
        .await
        .map_err(|e| RelayError::Detection(e.to_string()))?;

    if tool.is_available {
        tracing::info!(
            path = tool.program(),
            version = tool.version.as_deref().unwrap_or("?"),
            "found yt-dlp"
        );
    } else {
        tracing::warn!(
            path = tool.program(),
            "yt-dlp not found or not runnable; requests will fail until it is installed"
        );
    }

    let backend = YtDlpBackend::new(tool.program())
        .with_info_timeout(config.info_timeout)
        .with_process_limit(config.max_processes.map(|n| n as usize));

    Ok(AppState::new(Arc::new(backend), tool))
}

pub async fn run(config: Config) -> Result<(), RelayError> {
    let state = build_state(&config).await?;
    server::serve(config.socket_addr(), state).await?;
    Ok(())
}
