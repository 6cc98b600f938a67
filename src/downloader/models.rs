// Request and option models shared by the server and backends

use serde::{Deserialize, Deserializer, Serialize};

/// Selector used when the caller does not pass one
pub const DEFAULT_QUALITY: &str = "best";

/// Media kind requested by the caller. Only affects the response label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    #[default]
    Audio,
}

impl MediaKind {
    /// Anything other than the literal `"video"` is audio.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some("video") => Self::Video,
            _ => Self::Audio,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Video => "video/mp4",
            Self::Audio => "audio/mpeg",
        }
    }
}

impl<'de> Deserialize<'de> for MediaKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept any JSON value; non-strings fall through to audio.
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_selector(value.as_str()))
    }
}

/// Body of `POST /info`
#[derive(Debug, Clone, Deserialize)]
pub struct InfoRequest {
    pub url: String,
}

/// Body of `POST /download`
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    #[serde(default)]
    pub format: MediaKind,
    #[serde(default)]
    pub quality: Option<String>,
}

impl DownloadRequest {
    pub fn options(&self) -> DownloadOptions {
        DownloadOptions::new(self.format, self.quality.as_deref())
    }
}

/// Download options handed to a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub kind: MediaKind,
    /// Passed verbatim to the tool's `-f`
    pub quality: String,
}

impl DownloadOptions {
    pub fn new(kind: MediaKind, quality: Option<&str>) -> Self {
        let quality = match quality {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => DEFAULT_QUALITY.to_string(),
        };
        Self { kind, quality }
    }
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self::new(MediaKind::default(), None)
    }
}
