#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use indicatory::domain::error::IndicatoryError;
pub use indicatory::domain::ohlcv::OhlcvBar;
use indicatory::domain::quote::PriceQuote;
use indicatory::ports::data_port::DataPort;
use std::collections::HashMap;
use std::io::Write;

pub const ACCOUNT_SIZE: f64 = 50_000.0;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        code: &str,
        _exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, IndicatoryError> {
        Ok(self
            .data
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self, _exchange: &str) -> Result<Vec<String>, IndicatoryError> {
        Ok(self.data.keys().cloned().collect())
    }
}

pub fn at(date: &str) -> NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn quote(date: &str, ask: f64, bid: f64) -> PriceQuote {
    PriceQuote::from_ask_bid(at(date), ask, bid).unwrap()
}

pub fn make_bar(code: &str, date: &str, open: f64, close: f64) -> OhlcvBar {
    OhlcvBar {
        code: code.to_string(),
        exchange: "NYSE".to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open,
        high: open.max(close) + 1.0,
        low: open.min(close) - 1.0,
        close,
        volume: Some(1000),
    }
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
