//! Traded asset identity.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Asset {
    pub symbol: String,
    pub exchange: String,
}

impl Asset {
    pub fn new(symbol: impl Into<String>, exchange: impl Into<String>) -> Self {
        Asset {
            symbol: symbol.into(),
            exchange: exchange.into(),
        }
    }
}
