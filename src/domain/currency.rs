//! Relative Currency Strength (RCS).
//!
//! Compares an asset's open and close prices to the strength of the currency
//! it trades in, e.g. a US stock against a USD index.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::error::IndicatoryError;
use super::numeric::checked_div;
use super::ohlcv::{date_range, OhlcvBar};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RcsPoint {
    pub date: NaiveDate,
    pub rcs_open: f64,
    pub rcs_close: f64,
}

/// Divide the asset's open/close by the currency's open/close on the same date.
///
/// Currency bars outside the asset's date range are ignored; asset dates with
/// no currency bar are skipped. Output follows the order of `asset`.
pub fn relative_currency_strength(
    asset: &[OhlcvBar],
    currency: &[OhlcvBar],
) -> Result<Vec<RcsPoint>, IndicatoryError> {
    let Some((start, end)) = date_range(asset) else {
        return Ok(Vec::new());
    };
    let by_date: HashMap<NaiveDate, &OhlcvBar> = currency
        .iter()
        .filter(|b| b.date >= start && b.date <= end)
        .map(|b| (b.date, b))
        .collect();

    let mut points = Vec::with_capacity(asset.len());
    for bar in asset {
        let Some(fx) = by_date.get(&bar.date) else {
            debug!(date = %bar.date, code = %bar.code, "no currency bar, skipping");
            continue;
        };
        points.push(RcsPoint {
            date: bar.date,
            rcs_open: checked_div(bar.open, fx.open, "rcs open")?,
            rcs_close: checked_div(bar.close, fx.close, "rcs close")?,
        });
    }
    Ok(points)
}
