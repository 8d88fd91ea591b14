/// Rounds the reference price to the nearest multiple of `step`.
/// Ties go half away from zero (`f64::round`), so 24875 with step 50
/// rounds up to 24900.
pub fn atm(reference: f64, step: i64) -> i64 {
    (reference / step as f64).round() as i64 * step
}

/// One ITM strike, the ATM strike, then `otm` OTM strikes ascending.
pub fn call_window(atm: i64, step: i64, otm: usize) -> Vec<i64> {
    let mut strikes = vec![atm - step, atm];
    for i in 1..=otm as i64 {
        strikes.push(atm + i * step);
    }
    strikes
}

/// Mirror of [`call_window`]: for puts the ITM strike sits above the
/// ATM and the OTM strikes walk down.
pub fn put_window(atm: i64, step: i64, otm: usize) -> Vec<i64> {
    let mut strikes = vec![atm + step, atm];
    for i in 1..=otm as i64 {
        strikes.push(atm - i * step);
    }
    strikes
}
