use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::downloader::command::ToolCommand;
use crate::downloader::diagnostics::diagnose_error;
use crate::downloader::errors::DownloadError;
use crate::downloader::models::DownloadOptions;
use crate::downloader::traits::MediaBackend;
use crate::downloader::utils::{run_output, spawn_stream, MediaStream};

/// Runs the yt-dlp CLI, one child process per call.
pub struct YtDlpBackend {
    program: String,
    info_timeout: Option<u64>,
    gate: Option<Arc<Semaphore>>,
}

impl YtDlpBackend {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            info_timeout: None,
            gate: None,
        }
    }

    /// Kill metadata runs that take longer than `seconds`
    pub fn with_info_timeout(mut self, seconds: Option<u64>) -> Self {
        self.info_timeout = seconds;
        self
    }

    /// Allow at most `limit` yt-dlp processes at once; extra calls wait.
    pub fn with_process_limit(mut self, limit: Option<usize>) -> Self {
        self.gate = limit.map(|n| Arc::new(Semaphore::new(n.max(1))));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn admit(&self) -> Option<OwnedSemaphorePermit> {
        let gate = self.gate.as_ref()?;
        if gate.available_permits() == 0 {
            tracing::debug!("process limit reached, queueing");
        }
        // The semaphore is never closed, so acquiring only fails on shutdown.
        gate.clone().acquire_owned().await.ok()
    }

    async fn run_info(&self, cmd: &ToolCommand) -> Result<serde_json::Value, DownloadError> {
        let output = run_output(cmd, self.info_timeout).await?;
        if !output.status.success() {
            return Err(DownloadError::process_failed(
                output.status.code(),
                &output.stderr,
            ));
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    fn log_failure(&self, url: &str, err: &DownloadError) {
        let reason = match err {
            DownloadError::ProcessFailed { message, .. } => diagnose_error(message),
            _ => None,
        };
        tracing::warn!(
            backend = self.name(),
            url,
            reason = reason.map(|r| r.description()).unwrap_or("none"),
            transient = reason.map(|r| r.is_transient()).unwrap_or(false),
            error = %err,
            "yt-dlp failed"
        );
    }
}

#[async_trait]
impl MediaBackend for YtDlpBackend {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch_info(&self, url: &str) -> Result<serde_json::Value, DownloadError> {
        let cmd = ToolCommand::dump_json(&self.program, url);
        let _permit = self.admit().await;
        tracing::debug!(command = %cmd, "fetching metadata");

        let result = self.run_info(&cmd).await;
        if let Err(err) = &result {
            self.log_failure(url, err);
        }
        result
    }

    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
    ) -> Result<MediaStream, DownloadError> {
        let cmd = ToolCommand::stream_to_stdout(&self.program, url, options);
        let permit = self.admit().await;
        tracing::debug!(command = %cmd, "starting download");

        let result = spawn_stream(&cmd, permit).await;
        if let Err(err) = &result {
            self.log_failure(url, err);
        }
        result
    }
}
