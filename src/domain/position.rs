//! Long positions: sizing, stop-loss, costs and returns.
//!
//! A position is opened against a resolved [`RiskSpec`] and is closed at most
//! once. Sizing depends only on the opening state; returns and closing costs
//! exist only after the position is closed, which happens at most once.

use serde::Serialize;
use tracing::info;

use super::asset::Asset;
use super::error::IndicatoryError;
use super::fees::{Costs, FeeModel};
use super::numeric::{checked_div, round_to};
use super::quote::PriceQuote;
use super::record::PositionRecord;
use super::risk::RiskSpec;

/// Decimal places kept on stop-loss prices and returns.
pub const PRICE_PRECISION: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Open,
    Closed,
}

/// Parameters of a leveraged instrument tracking an underlying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leverage {
    /// Multiple of the underlying's price move the instrument follows.
    pub factor: f64,
    /// Instrument units per unit of the underlying.
    pub subscription_ratio: f64,
}

/// Realized result of a closed position, rounded to three decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Returns {
    pub net: f64,
    #[serde(rename = "net percent")]
    pub net_percent: f64,
    #[serde(rename = "final")]
    pub after_costs: f64,
}

/// State shared by every position variant.
///
/// Read-only outside this module: closing the owning position is the only
/// transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionState {
    asset: Asset,
    account_size: f64,
    opening: PriceQuote,
    closing: Option<PriceQuote>,
    risk: RiskSpec,
    fees: FeeModel,
    shares: i64,
}

impl PositionState {
    /// `unit_price` is the price of one share at the opening ask, which the
    /// factor variant scales by its subscription ratio.
    fn open(
        asset: Asset,
        account_size: f64,
        opening: PriceQuote,
        risk: RiskSpec,
        fees: FeeModel,
        unit_price: f64,
    ) -> Result<Self, IndicatoryError> {
        let max_size = checked_div(risk.risk_per_trade, risk.risk_percentage, "position size")?;
        let shares = checked_div(max_size, unit_price, "number of shares")?.round_ties_even();
        if !shares.is_finite() || shares.abs() >= i64::MAX as f64 {
            return Err(IndicatoryError::InvalidRiskSpec {
                pattern: format!("{risk:?}"),
                reason: format!("number of shares {shares} at unit price {unit_price} is out of range"),
            });
        }
        let shares = shares as i64;
        Ok(PositionState {
            asset,
            account_size,
            opening,
            closing: None,
            risk,
            fees,
            shares,
        })
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    pub fn account_size(&self) -> f64 {
        self.account_size
    }

    pub fn opening(&self) -> &PriceQuote {
        &self.opening
    }

    pub fn closing(&self) -> Option<&PriceQuote> {
        self.closing.as_ref()
    }

    pub fn risk(&self) -> &RiskSpec {
        &self.risk
    }

    pub fn fees(&self) -> FeeModel {
        self.fees
    }

    /// Close at `quote`. Closing twice keeps the first quote.
    fn close(&mut self, quote: PriceQuote) -> &PriceQuote {
        if let Some(existing) = &self.closing {
            info!(
                symbol = %self.asset.symbol,
                bid = existing.bid(),
                closed_at = %existing.date_time(),
                "position has already been closed"
            );
        }
        self.closing.get_or_insert(quote)
    }
}

mod sealed {
    use super::PriceQuote;

    /// Variant-specific pricing of the closing order, internal to this module.
    pub trait Pricing {
        /// Order volume of the closing order.
        fn closing_volume(&self, close: &PriceQuote) -> f64;
        /// Gross gain or loss when selling at `close`.
        fn gains(&self, close: &PriceQuote) -> f64;
    }
}

use sealed::Pricing;

/// Sizing, costs and returns shared by plain and leveraged long positions.
///
/// Sealed: only the position types in this module implement it. Closing is an
/// inherent method on each of them.
pub trait Position: Pricing {
    fn state(&self) -> &PositionState;

    /// Capital committed at the opening ask.
    fn size(&self) -> f64;
    fn stop_loss(&self) -> f64;

    fn leverage(&self) -> Option<Leverage> {
        None
    }

    fn shares(&self) -> i64 {
        self.state().shares
    }

    fn is_open(&self) -> bool {
        self.state().closing.is_none()
    }

    fn is_closed(&self) -> bool {
        !self.is_open()
    }

    fn status(&self) -> PositionStatus {
        if self.is_open() {
            PositionStatus::Open
        } else {
            PositionStatus::Closed
        }
    }

    fn opening_costs(&self) -> Costs {
        self.state().fees.costs(self.size())
    }

    fn closing_costs(&self) -> Option<Costs> {
        let state = self.state();
        state
            .closing
            .as_ref()
            .map(|close| state.fees.costs(self.closing_volume(close)))
    }

    fn total_cost(&self) -> Costs {
        let opening = self.opening_costs();
        match self.closing_costs() {
            Some(closing) => opening + closing,
            None => opening,
        }
    }

    /// `Ok(None)` while the position is open.
    fn returns(&self) -> Result<Option<Returns>, IndicatoryError> {
        let Some(close) = &self.state().closing else {
            info!(
                symbol = %self.state().asset.symbol,
                "no returns yet: position is still open"
            );
            return Ok(None);
        };
        let gains = self.gains(close);
        let gains_percent = checked_div(gains, self.size(), "net percent")?;
        let after_costs = gains - self.total_cost().total;
        Ok(Some(Returns {
            net: round_to(gains, PRICE_PRECISION),
            net_percent: round_to(gains_percent, PRICE_PRECISION),
            after_costs: round_to(after_costs, PRICE_PRECISION),
        }))
    }

    fn days_till_close(&self) -> Option<i64> {
        let state = self.state();
        state
            .closing
            .as_ref()
            .map(|close| state.opening.days_until(close))
    }

    fn to_record(&self) -> Result<PositionRecord, IndicatoryError> {
        PositionRecord::build(self)
    }
}

/// Plain long position in the asset itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LongPosition {
    state: PositionState,
}

impl LongPosition {
    pub fn new(
        asset: Asset,
        account_size: f64,
        opening: PriceQuote,
        risk: RiskSpec,
        fees: FeeModel,
    ) -> Result<Self, IndicatoryError> {
        let ask = opening.ask();
        let state = PositionState::open(asset, account_size, opening, risk, fees, ask)?;
        Ok(LongPosition { state })
    }

    /// Close the position at `quote`. Closing twice keeps the first quote.
    pub fn close(&mut self, quote: PriceQuote) -> &PriceQuote {
        self.state.close(quote)
    }
}

impl Position for LongPosition {
    fn state(&self) -> &PositionState {
        &self.state
    }

    fn size(&self) -> f64 {
        self.shares() as f64 * self.state.opening.ask()
    }

    fn stop_loss(&self) -> f64 {
        round_to(
            self.state.opening.ask() * (1.0 - self.state.risk.risk_percentage),
            PRICE_PRECISION,
        )
    }
}

impl Pricing for LongPosition {
    fn closing_volume(&self, close: &PriceQuote) -> f64 {
        self.shares() as f64 * close.ask()
    }

    fn gains(&self, close: &PriceQuote) -> f64 {
        self.shares() as f64 * close.bid() - self.size()
    }
}

/// Long position in a leveraged instrument (e.g. a factor certificate).
///
/// The account risk is spread over `factor` times the underlying's move, so
/// the stop-loss sits `risk_percentage / factor` below the opening ask.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorLongPosition {
    state: PositionState,
    leverage: Leverage,
    factor_risk_percentage: f64,
}

impl FactorLongPosition {
    pub fn new(
        asset: Asset,
        account_size: f64,
        opening: PriceQuote,
        risk: RiskSpec,
        fees: FeeModel,
        leverage: Leverage,
    ) -> Result<Self, IndicatoryError> {
        for (name, value) in [
            ("factor", leverage.factor),
            ("subscription ratio", leverage.subscription_ratio),
        ] {
            if !value.is_finite() {
                return Err(IndicatoryError::InvalidLeverage {
                    reason: format!("{name} must be finite, got {value}"),
                });
            }
        }
        let factor_risk_percentage =
            checked_div(risk.risk_percentage, leverage.factor, "factor risk percentage")?;
        let unit_price = opening.ask() * leverage.subscription_ratio;
        let state = PositionState::open(asset, account_size, opening, risk, fees, unit_price)?;
        Ok(FactorLongPosition {
            state,
            leverage,
            factor_risk_percentage,
        })
    }

    pub fn factor_risk_percentage(&self) -> f64 {
        self.factor_risk_percentage
    }

    /// Close the position at `quote`. Closing twice keeps the first quote.
    pub fn close(&mut self, quote: PriceQuote) -> &PriceQuote {
        self.state.close(quote)
    }
}

impl Position for FactorLongPosition {
    fn state(&self) -> &PositionState {
        &self.state
    }

    fn size(&self) -> f64 {
        self.shares() as f64 * self.state.opening.ask() * self.leverage.subscription_ratio
    }

    fn stop_loss(&self) -> f64 {
        round_to(
            self.state.opening.ask() * (1.0 - self.factor_risk_percentage),
            PRICE_PRECISION,
        )
    }

    fn leverage(&self) -> Option<Leverage> {
        Some(self.leverage)
    }
}

impl Pricing for FactorLongPosition {
    fn closing_volume(&self, close: &PriceQuote) -> f64 {
        self.shares() as f64 * close.ask() * self.leverage.subscription_ratio
    }

    fn gains(&self, close: &PriceQuote) -> f64 {
        (close.bid() - self.state.opening.ask())
            * self.shares() as f64
            * self.leverage.subscription_ratio
            * self.leverage.factor
    }
}

/// A long position whose variant was chosen from the caller's inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyLongPosition {
    Plain(LongPosition),
    Factor(FactorLongPosition),
}

impl AnyLongPosition {
    pub fn is_factor(&self) -> bool {
        matches!(self, AnyLongPosition::Factor(_))
    }

    /// Close the position at `quote`. Closing twice keeps the first quote.
    pub fn close(&mut self, quote: PriceQuote) -> &PriceQuote {
        match self {
            AnyLongPosition::Plain(p) => p.close(quote),
            AnyLongPosition::Factor(p) => p.close(quote),
        }
    }
}

impl Position for AnyLongPosition {
    fn state(&self) -> &PositionState {
        match self {
            AnyLongPosition::Plain(p) => p.state(),
            AnyLongPosition::Factor(p) => p.state(),
        }
    }

    fn size(&self) -> f64 {
        match self {
            AnyLongPosition::Plain(p) => p.size(),
            AnyLongPosition::Factor(p) => p.size(),
        }
    }

    fn stop_loss(&self) -> f64 {
        match self {
            AnyLongPosition::Plain(p) => p.stop_loss(),
            AnyLongPosition::Factor(p) => p.stop_loss(),
        }
    }

    fn leverage(&self) -> Option<Leverage> {
        match self {
            AnyLongPosition::Plain(p) => p.leverage(),
            AnyLongPosition::Factor(p) => p.leverage(),
        }
    }
}

impl Pricing for AnyLongPosition {
    fn closing_volume(&self, close: &PriceQuote) -> f64 {
        match self {
            AnyLongPosition::Plain(p) => p.closing_volume(close),
            AnyLongPosition::Factor(p) => p.closing_volume(close),
        }
    }

    fn gains(&self, close: &PriceQuote) -> f64 {
        match self {
            AnyLongPosition::Plain(p) => p.gains(close),
            AnyLongPosition::Factor(p) => p.gains(close),
        }
    }
}
