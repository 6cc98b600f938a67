// Downloader module - yt-dlp invocation layer

pub mod backends;
pub mod command;
pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod tools;
pub mod traits;
pub mod utils;

pub use backends::YtDlpBackend;
pub use errors::DownloadError;
pub use models::{DownloadOptions, DownloadRequest, InfoRequest, MediaKind};
pub use tools::{ToolInfo, ToolManager};
pub use traits::MediaBackend;
pub use utils::MediaStream;
