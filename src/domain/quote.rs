//! Bid/ask price quotes.
//!
//! A quote is built from any two of ask, bid and relative spread; the third is
//! derived on first access and cached for the lifetime of the quote.

use chrono::{NaiveDate, NaiveDateTime};
use std::cell::OnceCell;

use super::error::IndicatoryError;
use super::numeric::round_to;

/// Decimal places kept on a derived spread.
pub const SPREAD_PRECISION: i32 = 6;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone)]
pub struct PriceQuote {
    date_time: NaiveDateTime,
    ask: OnceCell<f64>,
    bid: OnceCell<f64>,
    spread: OnceCell<f64>,
}

impl PriceQuote {
    /// Build a quote from at least two of `ask`, `bid` and `spread`.
    ///
    /// Prices must be positive and the spread must lie in `[0, 2)` so every
    /// derivation stays finite.
    pub fn new(
        date_time: NaiveDateTime,
        ask: Option<f64>,
        bid: Option<f64>,
        spread: Option<f64>,
    ) -> Result<Self, IndicatoryError> {
        let supplied = [ask, bid, spread].iter().filter(|v| v.is_some()).count();
        if supplied < 2 {
            return Err(IndicatoryError::InvalidQuote {
                reason: format!(
                    "need two of ask, bid and spread (ask={ask:?}, bid={bid:?}, spread={spread:?})"
                ),
            });
        }

        for (name, price) in [("ask", ask), ("bid", bid)] {
            if let Some(p) = price {
                if !p.is_finite() || p <= 0.0 {
                    return Err(IndicatoryError::InvalidQuote {
                        reason: format!("{name} must be a positive price, got {p}"),
                    });
                }
            }
        }
        if let Some(s) = spread {
            if !s.is_finite() || !(0.0..2.0).contains(&s) {
                return Err(IndicatoryError::InvalidQuote {
                    reason: format!("spread must be in [0, 2), got {s}"),
                });
            }
        }

        Ok(PriceQuote {
            date_time,
            ask: cell(ask),
            bid: cell(bid),
            spread: cell(spread),
        })
    }

    pub fn from_ask_bid(
        date_time: NaiveDateTime,
        ask: f64,
        bid: f64,
    ) -> Result<Self, IndicatoryError> {
        Self::new(date_time, Some(ask), Some(bid), None)
    }

    pub fn from_ask_spread(
        date_time: NaiveDateTime,
        ask: f64,
        spread: f64,
    ) -> Result<Self, IndicatoryError> {
        Self::new(date_time, Some(ask), None, Some(spread))
    }

    pub fn from_bid_spread(
        date_time: NaiveDateTime,
        bid: f64,
        spread: f64,
    ) -> Result<Self, IndicatoryError> {
        Self::new(date_time, None, Some(bid), Some(spread))
    }

    pub fn date_time(&self) -> NaiveDateTime {
        self.date_time
    }

    /// ask = bid * (1 + s/2) / (1 - s/2)
    pub fn ask(&self) -> f64 {
        *self.ask.get_or_init(|| {
            let half = self.spread() / 2.0;
            self.bid() * (1.0 + half) / (1.0 - half)
        })
    }

    /// bid = ask * (1 - s/2) / (1 + s/2)
    pub fn bid(&self) -> f64 {
        *self.bid.get_or_init(|| {
            let half = self.spread() / 2.0;
            self.ask() * (1.0 - half) / (1.0 + half)
        })
    }

    /// |ask - bid| / midpoint, rounded to six decimals.
    pub fn spread(&self) -> f64 {
        *self.spread.get_or_init(|| {
            let (ask, bid) = (self.ask(), self.bid());
            let midpoint = (ask + bid) / 2.0;
            round_to((ask - bid).abs() / midpoint, SPREAD_PRECISION)
        })
    }

    /// Absolute distance between ask and bid.
    pub fn spread_amount(&self) -> f64 {
        (self.ask() - self.bid()).abs()
    }

    /// Whole days from this quote to `later`, floored, so a `later` quote 1.5
    /// days in the past is `-2`.
    pub fn days_until(&self, later: &PriceQuote) -> i64 {
        later
            .date_time
            .signed_duration_since(self.date_time)
            .num_seconds()
            .div_euclid(SECONDS_PER_DAY)
    }
}

impl PartialEq for PriceQuote {
    fn eq(&self, other: &Self) -> bool {
        self.date_time == other.date_time
            && self.ask() == other.ask()
            && self.bid() == other.bid()
            && self.spread() == other.spread()
    }
}

fn cell(value: Option<f64>) -> OnceCell<f64> {
    let cell = OnceCell::new();
    if let Some(v) = value {
        let _ = cell.set(v);
    }
    cell
}

/// Parse `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD`
/// (midnight).
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
