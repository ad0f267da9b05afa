//! Serializable snapshot of a position, for JSON export.
//!
//! Key names are part of the output contract and are spelled out with
//! `#[serde(rename)]`. Absent closing data serializes as `{}` rather than
//! `null`, except for `days till close`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::asset::Asset;
use super::error::IndicatoryError;
use super::fees::{Costs, FeeModel};
use super::position::{Position, PositionStatus, Returns};
use super::quote::PriceQuote;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadRecord {
    pub amount: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    pub ask: f64,
    pub bid: f64,
    pub date_time: String,
    pub spread: SpreadRecord,
}

impl From<&PriceQuote> for PriceRecord {
    fn from(quote: &PriceQuote) -> Self {
        PriceRecord {
            ask: quote.ask(),
            bid: quote.bid(),
            date_time: quote.date_time().format("%Y-%m-%dT%H:%M:%S").to_string(),
            spread: SpreadRecord {
                amount: quote.spread_amount(),
                percent: quote.spread(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskPerTradeRecord {
    pub amount: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostsRecord {
    pub fees: FeeModel,
    pub opening: Costs,
    #[serde(serialize_with = "none_as_empty_map")]
    pub closing: Option<Costs>,
    pub total: Costs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeverageRecord {
    pub factor: f64,
    #[serde(rename = "subscription ratio")]
    pub subscription_ratio: f64,
    #[serde(rename = "factor risk percentage")]
    pub factor_risk_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRecord {
    pub asset: Asset,
    #[serde(rename = "opening price")]
    pub opening_price: PriceRecord,
    #[serde(rename = "closing price", serialize_with = "none_as_empty_map")]
    pub closing_price: Option<PriceRecord>,
    #[serde(rename = "account size")]
    pub account_size: f64,
    #[serde(rename = "position size")]
    pub position_size: f64,
    #[serde(rename = "number of shares")]
    pub shares: i64,
    #[serde(rename = "stop-loss")]
    pub stop_loss: f64,
    pub status: PositionStatus,
    #[serde(rename = "risk per trade")]
    pub risk_per_trade: RiskPerTradeRecord,
    #[serde(rename = "risk percentage")]
    pub risk_percentage: f64,
    pub costs: CostsRecord,
    #[serde(serialize_with = "none_as_empty_map")]
    pub returns: Option<Returns>,
    #[serde(rename = "days till close")]
    pub days_till_close: Option<i64>,
    #[serde(flatten)]
    pub leverage: Option<LeverageRecord>,
}

impl PositionRecord {
    pub fn build<P: Position + ?Sized>(position: &P) -> Result<Self, IndicatoryError> {
        let state = position.state();
        let risk = state.risk();
        let leverage = position.leverage().map(|l| LeverageRecord {
            factor: l.factor,
            subscription_ratio: l.subscription_ratio,
            factor_risk_percentage: risk.risk_percentage / l.factor,
        });
        let returns = if position.is_open() {
            None
        } else {
            position.returns()?
        };

        Ok(PositionRecord {
            asset: state.asset().clone(),
            opening_price: PriceRecord::from(state.opening()),
            closing_price: state.closing().map(PriceRecord::from),
            account_size: state.account_size(),
            position_size: position.size(),
            shares: position.shares(),
            stop_loss: position.stop_loss(),
            status: position.status(),
            risk_per_trade: RiskPerTradeRecord {
                amount: risk.risk_per_trade,
                percent: risk.risk_per_trade_percent,
            },
            risk_percentage: risk.risk_percentage,
            costs: CostsRecord {
                fees: state.fees(),
                opening: position.opening_costs(),
                closing: position.closing_costs(),
                total: position.total_cost(),
            },
            returns,
            days_till_close: position.days_till_close(),
            leverage,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, IndicatoryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn none_as_empty_map<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
