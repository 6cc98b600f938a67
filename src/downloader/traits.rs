// Media backend trait definition

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::DownloadOptions;
use super::utils::MediaStream;

/// Trait for media backend implementations
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Fetch the tool's metadata document for a URL, untouched
    async fn fetch_info(&self, url: &str) -> Result<serde_json::Value, DownloadError>;

    /// Start a download and return its byte stream
    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
    ) -> Result<MediaStream, DownloadError>;
}
