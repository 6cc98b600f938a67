// Failure diagnostics - classifies yt-dlp error output
//
// The classification is for operators: it goes into the logs next to the
// failure, while callers only ever see the error message itself.

use serde::Serialize;

/// Why a yt-dlp run failed, as far as its stderr tells us
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No extractor matched the URL
    UnsupportedUrl,

    /// The requested `-f` selector matched nothing
    FormatUnavailable,

    /// DRM-protected or paid content
    DrmProtected,

    /// Needs login or an age-confirmed account
    AuthRequired,

    /// Private, deleted or otherwise gone
    VideoUnavailable,

    /// Geographic restriction
    GeoBlocked,

    /// 429 or similar throttling
    RateLimited,

    /// Bot detection / captcha
    BotDetection,

    /// HTTP 403 (general)
    Http403Forbidden,

    /// Timeouts and unreachable hosts
    NetworkError,

    Unknown,
}

impl FailureReason {
    /// Check if retrying the same request later might succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::BotDetection | Self::Http403Forbidden | Self::NetworkError
        )
    }

    /// Check if this is a permanent restriction (no workaround)
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::DrmProtected | Self::VideoUnavailable | Self::UnsupportedUrl
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::UnsupportedUrl => "Unsupported URL",
            Self::FormatUnavailable => "Requested format not available",
            Self::DrmProtected => "DRM-protected content",
            Self::AuthRequired => "Authentication required",
            Self::VideoUnavailable => "Video unavailable",
            Self::GeoBlocked => "Geographic restriction",
            Self::RateLimited => "Rate limited",
            Self::BotDetection => "Bot detection triggered",
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::NetworkError => "Network error",
            Self::Unknown => "Unknown failure",
        }
    }
}

/// Analyze error output and return the failure reason
pub fn diagnose_error(error: &str) -> Option<FailureReason> {
    let lower = error.to_lowercase();

    // Check patterns in order of specificity

    if lower.contains("unsupported url") || lower.contains("is not a valid url") {
        return Some(FailureReason::UnsupportedUrl);
    }

    if lower.contains("requested format is not available")
        || lower.contains("invalid format specification")
    {
        return Some(FailureReason::FormatUnavailable);
    }

    if lower.contains("drm")
        || lower.contains("widevine")
        || lower.contains("playready")
        || lower.contains("fairplay")
        || lower.contains("requires purchase")
        || lower.contains("rental")
    {
        return Some(FailureReason::DrmProtected);
    }

    if lower.contains("sign in to confirm your age")
        || lower.contains("age-restricted")
        || lower.contains("members only")
        || lower.contains("login required")
        || lower.contains("--cookies")
    {
        return Some(FailureReason::AuthRequired);
    }

    if lower.contains("private video")
        || lower.contains("video unavailable")
        || lower.contains("video has been removed")
        || lower.contains("video is unavailable")
        || lower.contains("404")
    {
        return Some(FailureReason::VideoUnavailable);
    }

    if lower.contains("not available in your country")
        || lower.contains("blocked in your country")
        || lower.contains("geo restriction")
        || lower.contains("geo-restricted")
    {
        return Some(FailureReason::GeoBlocked);
    }

    if lower.contains("429") || lower.contains("rate limit") || lower.contains("too many requests") {
        return Some(FailureReason::RateLimited);
    }

    if lower.contains("not a bot")
        || lower.contains("captcha")
        || lower.contains("unusual traffic")
    {
        return Some(FailureReason::BotDetection);
    }

    if lower.contains("403") || lower.contains("forbidden") {
        return Some(FailureReason::Http403Forbidden);
    }

    if lower.contains("timed out")
        || lower.contains("timeout")
        || lower.contains("connection refused")
        || lower.contains("network is unreachable")
        || lower.contains("name or service not known")
    {
        return Some(FailureReason::NetworkError);
    }

    if !error.trim().is_empty() {
        return Some(FailureReason::Unknown);
    }

    None
}
