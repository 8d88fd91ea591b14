//! Fetches one snapshot and prints the formatted report to stdout.
//! Never talks to Telegram, so it runs without credentials.

use anyhow::{Context, Result};
use chainwatch::{config::Config, nse::NseClient, tracker::DeltaTracker, watch};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let config = Config::from_env();

    let client = NseClient::new().context("Failed to create client")?;
    client.warmup().await;

    let mut tracker = DeltaTracker::new();
    let report = watch::poll_once(&client, &config, &mut tracker)
        .await
        .context("snapshot fetch failed")?;

    println!("{}", report.render());

    Ok(())
}
