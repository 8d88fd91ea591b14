use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::chain::{OptionRow, Side, SideQuote, lookup};
use crate::tracker::{Delta, DeltaTracker, Reading};

/// One strike's line in the report: the quote as fetched plus its
/// delta against the previous poll (`None` on the first sighting).
#[derive(Debug, Clone, Copy)]
pub struct LegLine {
    pub strike: i64,
    pub quote: SideQuote,
    pub delta: Option<Delta>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideSummary {
    pub oi_delta_sum: i64,
    pub avg_iv: f64,
    /// Legs with no previous reading. Their contribution to
    /// `oi_delta_sum` is zero, which is "no data", not "no change" --
    /// the report prints this count so a first poll reads as all-new
    /// instead of flat.
    pub new_legs: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct FuturesLine {
    pub oi: i64,
    pub volume: i64,
    pub delta: Option<(i64, i64)>,
}

#[derive(Debug)]
pub struct Report {
    pub symbol: String,
    pub expiry: String,
    pub underlying: f64,
    pub atm: i64,
    pub generated_at: DateTime<Utc>,
    pub calls: Vec<LegLine>,
    pub puts: Vec<LegLine>,
    pub futures: Option<FuturesLine>,
}

/// Looks up every strike in `window` on the given side and feeds the
/// readings through the tracker, in window order.
pub fn side_legs(
    rows: &[&OptionRow],
    window: &[i64],
    side: Side,
    tracker: &mut DeltaTracker,
) -> Vec<LegLine> {
    window
        .iter()
        .map(|&strike| {
            let quote = lookup(rows, strike, side);
            let delta = tracker.observe(strike, side, Reading::from(&quote));
            LegLine { strike, quote, delta }
        })
        .collect()
}

pub fn summarize(legs: &[LegLine]) -> SideSummary {
    let oi_delta_sum = legs.iter().filter_map(|l| l.delta).map(|d| d.oi).sum();
    let new_legs = legs.iter().filter(|l| l.delta.is_none()).count();

    let iv_total: f64 = legs.iter().map(|l| l.quote.implied_volatility).sum();
    let avg_iv = iv_total / legs.len().max(1) as f64;

    SideSummary {
        oi_delta_sum,
        avg_iv,
        new_legs,
    }
}

impl Report {
    /// True when any tracked leg or the futures pair moved its open
    /// interest since the previous poll.
    pub fn has_oi_change(&self) -> bool {
        let legs_moved = self
            .calls
            .iter()
            .chain(&self.puts)
            .filter_map(|l| l.delta)
            .any(|d| d.oi != 0);

        legs_moved
            || self
                .futures
                .and_then(|f| f.delta)
                .is_some_and(|(oi, _)| oi != 0)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{} option chain | {}",
            self.symbol,
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(
            out,
            "Expiry: {} | Spot: {:.2} | ATM: {}",
            self.expiry, self.underlying, self.atm
        );

        let _ = writeln!(out, "\n--- CALLS ---");
        render_side(&mut out, &self.calls);

        let _ = writeln!(out, "\n--- PUTS ---");
        render_side(&mut out, &self.puts);

        if let Some(fut) = &self.futures {
            let _ = writeln!(out, "\nFUTURES");
            let _ = write!(out, "OI {} | Vol {}", fut.oi, fut.volume);
            match fut.delta {
                Some((oi, vol)) => {
                    let _ = writeln!(out, " | dOI {oi:+} | dVol {vol:+}");
                }
                None => {
                    let _ = writeln!(out, " | first reading");
                }
            }
        }

        out
    }
}

fn render_side(out: &mut String, legs: &[LegLine]) {
    for leg in legs {
        let q = &leg.quote;
        let _ = write!(
            out,
            "{} LTP {:.2} | OI {} | Vol {} | IV {:.2}",
            leg.strike, q.last_price, q.open_interest, q.total_traded_volume, q.implied_volatility
        );
        match leg.delta {
            Some(d) => {
                let _ = writeln!(out, " | dOI {:+} | dVol {:+}", d.oi, d.volume);
            }
            None => {
                let _ = writeln!(out, " | new");
            }
        }
        let _ = writeln!(
            out,
            "  LTP*OI {:.0} | COI {:+} | LTP*COI {:.0}",
            q.last_price * q.open_interest as f64,
            q.change_in_oi,
            q.last_price * q.change_in_oi as f64
        );
    }

    let summary = summarize(legs);
    let _ = writeln!(
        out,
        "Sum dOI {:+} | avg IV {:.2} | {} new",
        summary.oi_delta_sum, summary.avg_iv, summary.new_legs
    );
}
