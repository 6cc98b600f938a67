use serde::Serialize;
use std::path::PathBuf;
use std::process::Command;

pub const YTDLP_BINARY: &str = "yt-dlp";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub path: Option<String>,
    pub version: Option<String>,
    pub is_available: bool,
}

impl ToolInfo {
    /// Path to hand to `Command::new`. Falls back to the bare name so PATH
    /// lookup still gets a chance at spawn time.
    pub fn program(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

/// Locates yt-dlp and reads its version.
pub struct ToolManager {
    override_path: Option<PathBuf>,
}

impl ToolManager {
    pub fn new(override_path: Option<PathBuf>) -> Self {
        Self { override_path }
    }

    pub fn detect(&self) -> ToolInfo {
        let path = match &self.override_path {
            Some(path) => Some(path.to_string_lossy().to_string()),
            None => self.find_binary(YTDLP_BINARY),
        };
        let version = path.as_deref().and_then(|p| self.get_version(p));

        ToolInfo {
            name: YTDLP_BINARY.to_string(),
            is_available: version.is_some(),
            path,
            version,
        }
    }

    fn candidate_paths(binary_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(format!("/opt/homebrew/bin/{}", binary_name)), // Homebrew on Apple Silicon
            PathBuf::from(format!("/usr/local/bin/{}", binary_name)),
            PathBuf::from(format!("/usr/bin/{}", binary_name)),
        ];
        // pip --user installs
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".local/bin").join(binary_name));
        }
        paths
    }

    fn find_binary(&self, binary_name: &str) -> Option<String> {
        // 1. Common install locations
        for path in Self::candidate_paths(binary_name) {
            if path.exists() {
                return Some(path.to_string_lossy().to_string());
            }
        }

        // 2. PATH
        if let Ok(output) = Command::new("which").arg(binary_name).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Some(path);
                }
            }
        }

        None
    }

    fn get_version(&self, path: &str) -> Option<String> {
        match Command::new(path).arg("--version").output() {
            Ok(output) if output.status.success() => {
                let out = String::from_utf8_lossy(&output.stdout).trim().to_string();
                Some(out)
            }
            _ => None,
        }
    }
}
