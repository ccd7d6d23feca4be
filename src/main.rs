use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::info;

use postgen::api::{ApiServer, AppState};
use postgen::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("postgen")
        .version("0.1.0")
        .about("Turn YouTube videos into platform-ready social media posts")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port for the HTTP API (overrides configuration)"),
        )
        .arg(
            Arg::new("cache-dir")
                .long("cache-dir")
                .value_name("DIR")
                .help("Audio cache directory (overrides configuration)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logging; RUST_LOG wins when set
    let default_filter = if matches.get_flag("verbose") {
        "postgen=debug,tower_http=debug,info"
    } else {
        "postgen=info,tower_http=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = Config::load(matches.get_one::<String>("config").map(String::as_str))?;

    if let Some(port) = matches.get_one::<String>("port") {
        config.server.port = port.parse()?;
    }

    if let Some(cache_dir) = matches.get_one::<String>("cache-dir") {
        config.audio.cache_dir = PathBuf::from(cache_dir);
    }

    config.validate()?;

    info!("postgen starting...");
    info!("{}", config.summary());

    let state = AppState::from_config(&config).await?;
    ApiServer::new(state, config.server.port).start().await
}
