use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// HTTP relay in front of yt-dlp
#[derive(Parser, Debug, Clone)]
#[command(name = "ytdlp-relay", version, about)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "RELAY_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, short, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// yt-dlp binary; searched in the usual install locations when unset
    #[arg(long, env = "YTDLP_PATH")]
    pub ytdlp_path: Option<PathBuf>,

    /// Maximum simultaneous yt-dlp processes (unbounded when unset)
    #[arg(long, env = "RELAY_MAX_PROCESSES", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_processes: Option<u32>,

    /// Seconds before a metadata lookup is killed (no limit when unset)
    #[arg(long, env = "RELAY_INFO_TIMEOUT", value_parser = clap::value_parser!(u64).range(1..))]
    pub info_timeout: Option<u64>,

    /// Log format; the level comes from RUST_LOG
    #[arg(long, env = "RELAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
