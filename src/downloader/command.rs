// Argument vectors for yt-dlp invocations
//
// The tool is always started directly with an argv, never through a shell.
// Caller input (URL, quality selector) only ever lands in single argv slots,
// and the URL sits behind `--` so a leading `-` cannot turn it into an option.

use std::fmt;

use super::models::DownloadOptions;

/// A program plus its discrete arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    /// `yt-dlp --dump-json -- <url>`: one JSON document on stdout
    pub fn dump_json(program: &str, url: &str) -> Self {
        Self {
            program: program.to_string(),
            args: vec!["--dump-json".to_string(), "--".to_string(), url.to_string()],
        }
    }

    /// `yt-dlp -f <quality> -o - -- <url>`: media bytes on stdout
    pub fn stream_to_stdout(program: &str, url: &str, options: &DownloadOptions) -> Self {
        Self {
            program: program.to_string(),
            args: vec![
                "-f".to_string(),
                options.quality.clone(),
                "-o".to_string(),
                "-".to_string(),
                "--".to_string(),
                url.to_string(),
            ],
        }
    }
}

impl fmt::Display for ToolCommand {
    /// For logs only. Quoted with `{:?}` so nothing here reads as shell syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {:?}", arg)?;
        }
        Ok(())
    }
}
