//! Risk spec resolution.
//!
//! Four quantities describe how much of an account a position risks:
//!
//! - `proportion`: capital allocated to the position
//! - `risk_per_trade`: absolute amount of the account that may be lost
//! - `risk_percentage`: stop-loss distance as a fraction of the entry price
//! - `risk_per_trade_percent`: `risk_per_trade` as a fraction of the account
//!
//! They are tied by `risk_per_trade = account_size * risk_per_trade_percent`
//! and `proportion = risk_per_trade / risk_percentage`, so most pairs of known
//! values determine the other two. [`resolve`] fills in whatever is missing.

use std::fmt;

use super::error::IndicatoryError;
use super::numeric::checked_div;

/// Partially specified risk parameters, as supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiskInputs {
    pub proportion: Option<f64>,
    pub risk_per_trade: Option<f64>,
    pub risk_percentage: Option<f64>,
    pub risk_per_trade_percent: Option<f64>,
}

/// Fully resolved risk parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskSpec {
    pub proportion: f64,
    pub risk_per_trade: f64,
    pub risk_percentage: f64,
    pub risk_per_trade_percent: f64,
}

impl RiskInputs {
    pub fn with_proportion(mut self, value: f64) -> Self {
        self.proportion = Some(value);
        self
    }

    pub fn with_risk_per_trade(mut self, value: f64) -> Self {
        self.risk_per_trade = Some(value);
        self
    }

    pub fn with_risk_percentage(mut self, value: f64) -> Self {
        self.risk_percentage = Some(value);
        self
    }

    pub fn with_risk_per_trade_percent(mut self, value: f64) -> Self {
        self.risk_per_trade_percent = Some(value);
        self
    }

    /// Presence bitmask, most significant bit first:
    /// proportion (8), risk_per_trade (4), risk_percentage (2),
    /// risk_per_trade_percent (1).
    pub fn pattern(&self) -> u8 {
        self.values()
            .iter()
            .fold(0, |bits, v| (bits << 1) | u8::from(v.is_some()))
    }

    fn values(&self) -> [Option<f64>; 4] {
        [
            self.proportion,
            self.risk_per_trade,
            self.risk_percentage,
            self.risk_per_trade_percent,
        ]
    }
}

impl fmt::Display for RiskInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |x| x.to_string());
        write!(
            f,
            "(proportion={}, risk_per_trade={}, risk_percentage={}, risk_per_trade_percent={})",
            show(self.proportion),
            show(self.risk_per_trade),
            show(self.risk_percentage),
            show(self.risk_per_trade_percent),
        )
    }
}

impl RiskSpec {
    /// Whether the four values satisfy both identities within `1e-9` relative
    /// tolerance. [`resolve`] never checks this for fully specified input.
    pub fn is_consistent(&self, account_size: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0);
        close(self.risk_per_trade, account_size * self.risk_per_trade_percent)
            && close(self.proportion * self.risk_percentage, self.risk_per_trade)
    }
}

/// Resolve the missing risk parameters for an account of `account_size`.
///
/// Fails with [`IndicatoryError::InvalidRiskSpec`] for the six presence
/// patterns that do not pin down a unique solution, and with
/// [`IndicatoryError::DivisionByZero`] when a zero value is used as a divisor.
/// Supplied values are never overwritten; a fully specified input is returned
/// as given. Non-finite inputs, or inputs that resolve to non-finite values,
/// are an `InvalidRiskSpec` as well.
pub fn resolve(account_size: f64, inputs: &RiskInputs) -> Result<RiskSpec, IndicatoryError> {
    let invalid = |reason: &str| IndicatoryError::InvalidRiskSpec {
        pattern: inputs.to_string(),
        reason: reason.to_string(),
    };
    if !account_size.is_finite() {
        return Err(invalid("account size must be finite"));
    }
    if !inputs.values().iter().flatten().all(|v| v.is_finite()) {
        return Err(invalid("values must be finite"));
    }

    let a = account_size;
    let (prop, rpt, rp, p) = match (
        inputs.proportion,
        inputs.risk_per_trade,
        inputs.risk_percentage,
        inputs.risk_per_trade_percent,
    ) {
        (None, None, None, None)
        | (None, None, None, Some(_))
        | (None, None, Some(_), None)
        | (None, Some(_), None, None)
        | (None, Some(_), None, Some(_))
        | (Some(_), None, None, None) => {
            return Err(invalid("not enough information to resolve"));
        }

        (None, None, Some(rp), Some(p)) => {
            let rpt = a * p;
            (checked_div(rpt, rp, "proportion")?, rpt, rp, p)
        }
        (None, Some(rpt), Some(rp), None) => (
            checked_div(rpt, rp, "proportion")?,
            rpt,
            rp,
            checked_div(rpt, a, "risk_per_trade_percent")?,
        ),
        (None, Some(rpt), Some(rp), Some(p)) => (checked_div(rpt, rp, "proportion")?, rpt, rp, p),
        (Some(prop), None, None, Some(p)) => {
            let rpt = a * p;
            (prop, rpt, checked_div(rpt, prop, "risk_percentage")?, p)
        }
        (Some(prop), None, Some(rp), None) => {
            let rpt = prop * rp;
            (prop, rpt, rp, checked_div(rpt, a, "risk_per_trade_percent")?)
        }
        (Some(prop), None, Some(rp), Some(p)) => (prop, a * p, rp, p),
        (Some(prop), Some(rpt), None, None) => (
            prop,
            rpt,
            checked_div(rpt, prop, "risk_percentage")?,
            checked_div(rpt, a, "risk_per_trade_percent")?,
        ),
        (Some(prop), Some(rpt), None, Some(p)) => {
            (prop, rpt, checked_div(rpt, prop, "risk_percentage")?, p)
        }
        (Some(prop), Some(rpt), Some(rp), None) => {
            (prop, rpt, rp, checked_div(rpt, a, "risk_per_trade_percent")?)
        }
        (Some(prop), Some(rpt), Some(rp), Some(p)) => (prop, rpt, rp, p),
    };

    let spec = RiskSpec {
        proportion: prop,
        risk_per_trade: rpt,
        risk_percentage: rp,
        risk_per_trade_percent: p,
    };
    if ![prop, rpt, rp, p].iter().all(|v| v.is_finite()) {
        return Err(invalid("resolves to non-finite values"));
    }
    Ok(spec)
}
