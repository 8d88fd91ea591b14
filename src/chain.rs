use serde::Deserialize;

use crate::nse::NseError;

/// Option side tag, matching the upstream `CE`/`PE` sub-records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Call,
    Put,
}

#[derive(Debug, Deserialize)]
pub struct OptionChainResponse {
    pub records: Records,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Records {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub underlying_value: f64,
    #[serde(default)]
    pub expiry_dates: Vec<String>,
    #[serde(default)]
    pub data: Vec<OptionRow>,
}

#[derive(Debug, Deserialize)]
pub struct OptionRow {
    #[serde(rename = "strikePrice")]
    pub strike_price: i64,

    #[serde(rename = "expiryDate", default)]
    pub expiry_date: Option<String>,

    #[serde(rename = "CE")]
    pub call: Option<SideQuote>,

    #[serde(rename = "PE")]
    pub put: Option<SideQuote>,
}

/// One side's market row. Upstream omits fields on illiquid strikes, so
/// everything defaults; an all-zero quote is a valid reading.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SideQuote {
    #[serde(rename = "lastPrice", default)]
    pub last_price: f64,

    #[serde(rename = "openInterest", default)]
    pub open_interest: i64,

    #[serde(rename = "changeinOpenInterest", default)]
    pub change_in_oi: i64,

    #[serde(rename = "totalTradedVolume", default)]
    pub total_traded_volume: i64,

    #[serde(rename = "impliedVolatility", default)]
    pub implied_volatility: f64,
}

impl Records {
    /// The upstream expiry list is sorted soonest-first.
    pub fn nearest_expiry(&self) -> Result<&str, NseError> {
        self.expiry_dates
            .first()
            .map(String::as_str)
            .ok_or_else(|| NseError::Schema("no expiry dates in records".to_string()))
    }

    pub fn rows_for_expiry(&self, expiry: &str) -> Vec<&OptionRow> {
        self.data
            .iter()
            .filter(|row| row.expiry_date.as_deref() == Some(expiry))
            .collect()
    }
}

impl OptionRow {
    pub fn side(&self, side: Side) -> Option<&SideQuote> {
        match side {
            Side::Call => self.call.as_ref(),
            Side::Put => self.put.as_ref(),
        }
    }
}

/// Finds the quote for one (strike, side) leg. No matching row or a
/// missing sub-record yields the zero quote, not an error.
pub fn lookup(rows: &[&OptionRow], strike: i64, side: Side) -> SideQuote {
    rows.iter()
        .find(|row| row.strike_price == strike)
        .and_then(|row| row.side(side))
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::include_str;

    const OPTION_CHAIN: &str = include_str!("fixtures/option_chain.json");

    fn fixture() -> OptionChainResponse {
        serde_json::from_str(OPTION_CHAIN).unwrap()
    }

    #[test]
    fn test_parse_option_chain() {
        let chain: Result<OptionChainResponse, serde_json::Error> =
            serde_json::from_str(OPTION_CHAIN);

        if let Err(e) = &chain {
            println!("Error {e:?}");
        }

        assert!(chain.is_ok());
        assert_eq!(chain.unwrap().records.underlying_value, 24873.4);
    }

    #[test]
    fn test_nearest_expiry_filters_rows() {
        let chain = fixture();
        let expiry = chain.records.nearest_expiry().unwrap();
        assert_eq!(expiry, "04-Sep-2025");

        let rows = chain.records.rows_for_expiry(expiry);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.expiry_date.as_deref() == Some(expiry)));
    }

    #[test]
    fn test_nearest_expiry_empty_is_schema_error() {
        let records = Records {
            timestamp: None,
            underlying_value: 0.0,
            expiry_dates: vec![],
            data: vec![],
        };
        assert!(matches!(records.nearest_expiry(), Err(NseError::Schema(_))));
    }

    #[test]
    fn test_lookup_present_and_missing() {
        let chain = fixture();
        let expiry = chain.records.nearest_expiry().unwrap();
        let rows = chain.records.rows_for_expiry(expiry);

        let quote = lookup(&rows, 24850, Side::Call);
        assert_eq!(quote.open_interest, 1200);
        assert_eq!(quote.total_traded_volume, 340);
        assert_eq!(quote.implied_volatility, 14.2);

        // 24950 exists but has no PE sub-record
        let quote = lookup(&rows, 24950, Side::Put);
        assert_eq!(quote.open_interest, 0);
        assert_eq!(quote.implied_volatility, 0.0);

        // strike not listed at all
        let quote = lookup(&rows, 30000, Side::Call);
        assert_eq!(quote.open_interest, 0);
        assert_eq!(quote.total_traded_volume, 0);
    }
}
