use clap::Parser;

use ytdlp_relay_lib::config::Config;
use ytdlp_relay_lib::logging::init_logging;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    if let Err(e) = init_logging(config.log_format) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = ytdlp_relay_lib::run(config).await {
        tracing::error!(error = %e, "relay stopped");
        std::process::exit(1);
    }
}
