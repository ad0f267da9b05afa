//! Core domain types and logic.

pub mod asset;
pub mod quote;
pub mod fees;
pub mod risk;
pub mod position;
pub mod record;
pub mod factory;
pub mod ohlcv;
pub mod currency;
pub mod config_validation;
pub mod numeric;
pub mod error;
