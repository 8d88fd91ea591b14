//! One poll iteration: fetch the chain and the derivative quote,
//! pick the strike windows, run everything through the tracker and
//! assemble a [`Report`].

use chrono::Utc;

use crate::chain::Side;
use crate::config::Config;
use crate::nse::{NseClient, NseError};
use crate::report::{self, FuturesLine, Report};
use crate::scan;
use crate::strikes;
use crate::tracker::DeltaTracker;

pub async fn poll_once(
    client: &NseClient,
    config: &Config,
    tracker: &mut DeltaTracker,
) -> Result<Report, NseError> {
    let chain = client.option_chain(&config.symbol).await?;
    let records = &chain.records;

    let expiry = records.nearest_expiry()?.to_string();
    let rows = records.rows_for_expiry(&expiry);

    let atm = strikes::atm(records.underlying_value, config.strike_step);
    let call_window = strikes::call_window(atm, config.strike_step, config.otm_count);
    let put_window = strikes::put_window(atm, config.strike_step, config.otm_count);

    // Both fetches have to succeed before the tracker is touched, so a
    // failed iteration leaves the previous readings intact and the next
    // successful poll's deltas span the gap.
    let quote = client.derivative_quote(&config.symbol).await?;

    let calls = report::side_legs(&rows, &call_window, Side::Call, tracker);
    let puts = report::side_legs(&rows, &put_window, Side::Put, tracker);

    let futures = scan::find_oi_volume(&quote).map(|(oi, volume)| {
        let (oi, volume) = (oi as i64, volume as i64);
        FuturesLine {
            oi,
            volume,
            delta: tracker.observe_futures(oi, volume),
        }
    });

    Ok(Report {
        symbol: config.symbol.clone(),
        expiry,
        underlying: records.underlying_value,
        atm,
        generated_at: Utc::now(),
        calls,
        puts,
        futures,
    })
}
