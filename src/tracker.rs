use std::collections::HashMap;

use crate::chain::{Side, SideQuote};

/// One leg's snapshot from a single poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub oi: i64,
    pub volume: i64,
    pub iv: f64,
}

impl From<&SideQuote> for Reading {
    fn from(quote: &SideQuote) -> Self {
        Reading {
            oi: quote.open_interest,
            volume: quote.total_traded_volume,
            iv: quote.implied_volatility,
        }
    }
}

/// Element-wise current minus previous. A missing previous reading is
/// `None` at the call site, never a zero delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub oi: i64,
    pub volume: i64,
    pub iv: f64,
}

/// Previous-poll state for every tracked leg plus the futures pair.
/// Owned by the loop driver and passed into each iteration; nothing
/// here survives a restart.
#[derive(Debug, Default)]
pub struct DeltaTracker {
    legs: HashMap<(i64, Side), Reading>,
    futures: Option<(i64, i64)>,
}

impl DeltaTracker {
    pub fn new() -> DeltaTracker {
        DeltaTracker::default()
    }

    /// Records `reading` for the leg and returns its delta against the
    /// previous poll, or `None` on the first observation of that leg.
    pub fn observe(&mut self, strike: i64, side: Side, reading: Reading) -> Option<Delta> {
        let previous = self.legs.insert((strike, side), reading);

        previous.map(|prev| Delta {
            oi: reading.oi - prev.oi,
            volume: reading.volume - prev.volume,
            iv: reading.iv - prev.iv,
        })
    }

    /// Same contract as [`observe`](Self::observe) for the single
    /// futures (open interest, volume) pair.
    pub fn observe_futures(&mut self, oi: i64, volume: i64) -> Option<(i64, i64)> {
        let previous = self.futures.replace((oi, volume));

        previous.map(|(prev_oi, prev_vol)| (oi - prev_oi, volume - prev_vol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(oi: i64, volume: i64, iv: f64) -> Reading {
        Reading { oi, volume, iv }
    }

    #[test]
    fn test_first_observation_is_none() {
        let mut tracker = DeltaTracker::new();
        assert_eq!(tracker.observe(24850, Side::Call, reading(100, 10, 14.0)), None);
        assert_eq!(tracker.observe_futures(5000, 900), None);
    }

    #[test]
    fn test_identical_readings_give_zero_delta() {
        let mut tracker = DeltaTracker::new();
        let r = reading(100, 10, 14.0);

        tracker.observe(24850, Side::Call, r);
        let delta = tracker.observe(24850, Side::Call, r).unwrap();

        assert_eq!(delta, Delta { oi: 0, volume: 0, iv: 0.0 });
    }

    #[test]
    fn test_delta_is_current_minus_previous() {
        let mut tracker = DeltaTracker::new();
        tracker.observe(24850, Side::Put, reading(100, 10, 14.0));
        let delta = tracker.observe(24850, Side::Put, reading(130, 8, 14.5)).unwrap();

        assert_eq!(delta.oi, 30);
        assert_eq!(delta.volume, -2);
        assert!((delta.iv - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_legs_are_keyed_by_strike_and_side() {
        let mut tracker = DeltaTracker::new();
        tracker.observe(24850, Side::Call, reading(100, 10, 14.0));

        // same strike, other side: still a first observation
        assert_eq!(tracker.observe(24850, Side::Put, reading(200, 20, 15.0)), None);
    }

    #[test]
    fn test_map_always_holds_latest_reading() {
        let mut tracker = DeltaTracker::new();
        tracker.observe(24850, Side::Call, reading(100, 10, 14.0));
        tracker.observe(24850, Side::Call, reading(150, 12, 14.2));
        let delta = tracker.observe(24850, Side::Call, reading(150, 12, 14.2)).unwrap();

        // delta against the second reading, not the first
        assert_eq!(delta.oi, 0);
    }

    #[test]
    fn test_futures_delta() {
        let mut tracker = DeltaTracker::new();
        tracker.observe_futures(5000, 900);
        assert_eq!(tracker.observe_futures(5400, 850), Some((400, -50)));
    }
}
