//! One-shot post generation from the terminal, no server involved.

use anyhow::{anyhow, Result};
use tracing::info;

use postgen::api::{handlers, AppState};
use postgen::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("postgen=info,warn")
        .init();

    let url = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: generate-posts <youtube-url>"))?;

    let config = Config::load(None)?;
    config.validate()?;

    info!("Generating posts for {}", url);
    let state = AppState::from_config(&config).await?;

    let bundle = handlers::generate_post(&state, &url).await?;

    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(())
}
