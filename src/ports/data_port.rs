//! Price history access port trait.

use crate::domain::error::IndicatoryError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `code` on `exchange` between the two dates inclusive, oldest first.
    fn fetch_ohlcv(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, IndicatoryError>;

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, IndicatoryError>;
}
