//! Position opening strategies.
//!
//! Each strategy derives the risk inputs it needs, resolves them into a
//! [`RiskSpec`](super::risk::RiskSpec) and builds the position.

use tracing::warn;

use super::asset::Asset;
use super::error::IndicatoryError;
use super::fees::FeeModel;
use super::position::{AnyLongPosition, FactorLongPosition, Leverage, LongPosition};
use super::quote::PriceQuote;
use super::risk::{resolve, RiskInputs};

/// Everything needed to open a long position except the strategy's own
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRequest {
    pub account_size: f64,
    pub asset: Asset,
    pub quote: PriceQuote,
    pub fees: FeeModel,
    pub risk: RiskInputs,
}

impl OpenRequest {
    pub fn new(account_size: f64, asset: Asset, quote: PriceQuote) -> Self {
        OpenRequest {
            account_size,
            asset,
            quote,
            fees: FeeModel::default(),
            risk: RiskInputs::default(),
        }
    }

    pub fn with_fees(mut self, fees: FeeModel) -> Self {
        self.fees = fees;
        self
    }

    pub fn with_risk(mut self, risk: RiskInputs) -> Self {
        self.risk = risk;
        self
    }

    fn into_long(self) -> Result<LongPosition, IndicatoryError> {
        let spec = resolve(self.account_size, &self.risk)?;
        LongPosition::new(self.asset, self.account_size, self.quote, spec, self.fees)
    }
}

/// Open a long position with the caller's risk inputs as given.
///
/// When both `factor` and `subscription_ratio` are supplied the position is a
/// [`FactorLongPosition`]; otherwise it is a plain [`LongPosition`].
pub fn open_long(
    request: OpenRequest,
    factor: Option<f64>,
    subscription_ratio: Option<f64>,
) -> Result<AnyLongPosition, IndicatoryError> {
    match (factor, subscription_ratio) {
        (Some(factor), Some(subscription_ratio)) => {
            let spec = resolve(request.account_size, &request.risk)?;
            let position = FactorLongPosition::new(
                request.asset,
                request.account_size,
                request.quote,
                spec,
                request.fees,
                Leverage {
                    factor,
                    subscription_ratio,
                },
            )?;
            Ok(AnyLongPosition::Factor(position))
        }
        (None, None) => Ok(AnyLongPosition::Plain(request.into_long()?)),
        (factor, subscription_ratio) => {
            warn!(
                symbol = %request.asset.symbol,
                ?factor,
                ?subscription_ratio,
                "factor and subscription ratio must both be set; opening a plain position"
            );
            Ok(AnyLongPosition::Plain(request.into_long()?))
        }
    }
}

/// Open a long position whose risk percentage is widened by the quote's
/// spread: `risk_percentage = base_risk_percentage + spread`.
pub fn open_long_spread_aware(
    mut request: OpenRequest,
    base_risk_percentage: f64,
) -> Result<LongPosition, IndicatoryError> {
    request.risk.risk_percentage = Some(base_risk_percentage + request.quote.spread());
    request.into_long()
}

/// Open a long position protected by an explicit stop-loss price.
///
/// The stop must sit below the bid: at or above the ask it cannot protect the
/// position, and between bid and ask it would trigger on execution.
pub fn open_long_with_stop_loss(
    mut request: OpenRequest,
    stop_loss: f64,
) -> Result<LongPosition, IndicatoryError> {
    let ask = request.quote.ask();
    let bid = request.quote.bid();
    if !stop_loss.is_finite() {
        return Err(IndicatoryError::InvalidStopLoss {
            stop_loss,
            reason: "must be a finite price".into(),
        });
    }
    if stop_loss >= ask {
        return Err(IndicatoryError::InvalidStopLoss {
            stop_loss,
            reason: format!("must be below the ask price {ask}"),
        });
    }
    if bid <= stop_loss {
        return Err(IndicatoryError::InvalidStopLoss {
            stop_loss,
            reason: format!("lies inside the spread ({bid} - {ask}) and would trigger immediately"),
        });
    }
    request.risk.risk_percentage = Some(1.0 - stop_loss / ask);
    request.into_long()
}
