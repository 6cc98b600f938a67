//! Shared fixtures: a fake yt-dlp written once per test binary.
//!
//! The fake picks its behavior from the URL (always the last argument):
//! `fail:` exits 1 with an `ERROR:` line, `garbage:` prints non-JSON,
//! `binary:` prints raw bytes, `args:` echoes its argv one per line,
//! `slow:` sleeps briefly first. Anything else succeeds normally.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use axum::Router;
use ytdlp_relay_lib::downloader::{ToolInfo, YtDlpBackend};
use ytdlp_relay_lib::server::{create_router, AppState};

const FAKE_TOOL: &str = r#"#!/bin/sh
for arg in "$@"; do url="$arg"; done
case "$url" in
  fail:*) echo "WARNING: noise" >&2; echo "ERROR: Unsupported URL: $url" >&2; exit 1 ;;
  garbage:*) echo "this is not json"; exit 0 ;;
  binary:*) printf '\000\001\377\376binary\000'; exit 0 ;;
  args:*) printf '%s\n' "$@"; exit 0 ;;
  slow:*) sleep 0.2 ;;
esac
if [ "$1" = "--dump-json" ]; then
  printf '{"webpage_url":"%s","title":"fake","extractor":"generic"}\n' "$url"
else
  printf 'media:%s' "$url"
fi
"#;

pub const BINARY_PAYLOAD: &[u8] = b"\x00\x01\xff\xfebinary\x00";

pub fn fake_tool() -> &'static str {
    static TOOL: OnceLock<String> = OnceLock::new();
    TOOL.get_or_init(|| {
        let dir: PathBuf =
            std::env::temp_dir().join(format!("ytdlp-relay-fake-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("yt-dlp");
        std::fs::write(&path, FAKE_TOOL).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    })
}

pub fn state_for(program: &str, backend: YtDlpBackend) -> AppState {
    let tool = ToolInfo {
        name: "yt-dlp".to_string(),
        path: Some(program.to_string()),
        version: Some("2099.01.01".to_string()),
        is_available: true,
    };
    AppState::new(Arc::new(backend), tool)
}

pub fn fake_state() -> AppState {
    let program = fake_tool();
    state_for(program, YtDlpBackend::new(program))
}

pub fn fake_app() -> Router {
    create_router(fake_state())
}
