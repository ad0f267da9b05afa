//! OHLC(V) bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub code: String,
    pub exchange: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Currency and index series usually carry no volume.
    pub volume: Option<i64>,
}

/// First and last date covered by `bars`, in any order.
pub fn date_range(bars: &[OhlcvBar]) -> Option<(NaiveDate, NaiveDate)> {
    let min = bars.iter().map(|b| b.date).min()?;
    let max = bars.iter().map(|b| b.date).max()?;
    Some((min, max))
}
