// Error types for the yt-dlp backend

use std::io;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// yt-dlp binary does not exist at the resolved path
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Spawning failed for any other reason (permissions, fd limits, ...)
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran and exited with a non-zero status
    #[error("Command failed with {}: {message}", exit_label(.code))]
    ProcessFailed { code: Option<i32>, message: String },

    /// Metadata output was not valid JSON
    #[error("Failed to parse yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading the child's pipes failed
    #[error("Failed to read yt-dlp output: {0}")]
    Io(#[from] io::Error),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "signal".to_string(),
    }
}

impl DownloadError {
    pub fn spawn(program: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::ToolNotFound(program.to_string())
        } else {
            Self::Spawn {
                program: program.to_string(),
                source,
            }
        }
    }

    /// Build a process failure from the captured stderr of the tool.
    pub fn process_failed(code: Option<i32>, stderr: &[u8]) -> Self {
        Self::ProcessFailed {
            code,
            message: failure_message(stderr),
        }
    }
}

lazy_static! {
    static ref ERROR_LINE_RE: Regex = Regex::new(r"(?m)^ERROR:\s*(.+?)\s*$").unwrap();
}

/// Pick the most useful line out of yt-dlp's stderr. yt-dlp prefixes fatal
/// problems with `ERROR:`; the last one is the one that ended the run.
pub fn failure_message(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);

    if let Some(caps) = ERROR_LINE_RE.captures_iter(&text).last() {
        if let Some(line) = caps.get(1) {
            return line.as_str().to_string();
        }
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        "yt-dlp produced no error output".to_string()
    } else {
        trimmed.to_string()
    }
}
