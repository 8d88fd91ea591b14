use std::time::Duration;

use chainwatch::config::Config;
use chainwatch::nse::{NseClient, NseError};
use chainwatch::telegram::Notifier;
use chainwatch::tracker::DeltaTracker;
use chainwatch::watch;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_line_number(true)
        .init();

    info!("chainwatch");

    let config = Config::from_env();
    info!(
        "watching {} every {}s, step {}, {} OTM strikes",
        config.symbol, config.poll_secs, config.strike_step, config.otm_count
    );

    let client = match NseClient::new() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create client: {e:?}");
            return;
        }
    };
    client.warmup().await;

    let notifier = Notifier::from_config(&config);
    let mut tracker = DeltaTracker::new();
    let interval = Duration::from_secs(config.poll_secs);

    loop {
        // Any iteration error is logged and the loop keeps going; the
        // only resilience here is trying again after the sleep.
        if let Err(e) = run_once(&client, notifier.as_ref(), &config, &mut tracker).await {
            match &e {
                NseError::Transport(_) => warn!("iteration aborted: {e}"),
                _ => error!("iteration aborted: {e}"),
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, exiting");
                break;
            }
        }
    }
}

async fn run_once(
    client: &NseClient,
    notifier: Option<&Notifier>,
    config: &Config,
    tracker: &mut DeltaTracker,
) -> Result<(), NseError> {
    let report = watch::poll_once(client, config, tracker).await?;
    info!(
        "polled {}: expiry {} spot {:.2} atm {}",
        report.symbol, report.expiry, report.underlying, report.atm
    );

    let Some(notifier) = notifier else {
        return Ok(());
    };

    if !config.send_every_run && !report.has_oi_change() {
        debug!("no OI movement, skipping delivery");
        return Ok(());
    }

    match notifier.send(&report.render()).await {
        Ok(()) => info!("report delivered"),
        Err(e) => warn!("delivery failed: {e}"),
    }

    Ok(())
}
