//! Position ticket validation.
//!
//! Checks the shape of a ticket file before any position is built. Whether the
//! risk inputs are sufficient is left to the risk resolver.

use crate::domain::error::IndicatoryError;
use crate::domain::quote::parse_date_time;
use crate::ports::config_port::ConfigPort;

pub const STRATEGIES: [&str; 3] = ["plain", "spread_aware", "stop_loss"];

const QUOTE_KEYS: [&str; 3] = ["ask", "bid", "spread"];

const NUMERIC_KEYS: [(&str, &str); 10] = [
    ("risk", "proportion"),
    ("risk", "risk_per_trade"),
    ("risk", "risk_percentage"),
    ("risk", "risk_per_trade_percent"),
    ("risk", "base_risk_percentage"),
    ("risk", "stop_loss"),
    ("fees", "fixed"),
    ("fees", "variable"),
    ("factor", "factor"),
    ("factor", "subscription_ratio"),
];

pub fn validate_position_config(config: &dyn ConfigPort) -> Result<(), IndicatoryError> {
    validate_account_size(config)?;
    validate_asset(config)?;
    validate_quote(config, "opening")?;
    if has_any_key(config, "closing", &["date_time", "ask", "bid", "spread"]) {
        validate_quote(config, "closing")?;
    }
    for (section, key) in NUMERIC_KEYS {
        validate_numeric(config, section, key)?;
    }
    validate_strategy(config)?;
    Ok(())
}

fn validate_account_size(config: &dyn ConfigPort) -> Result<(), IndicatoryError> {
    if config.get_string("account", "size").is_none() {
        return Err(missing("account", "size"));
    }
    validate_numeric(config, "account", "size")?;
    if config.get_double("account", "size", 0.0) <= 0.0 {
        return Err(invalid("account", "size", "account size must be positive"));
    }
    Ok(())
}

fn validate_asset(config: &dyn ConfigPort) -> Result<(), IndicatoryError> {
    for key in ["symbol", "exchange"] {
        if config.get_string("asset", key).is_none() {
            return Err(missing("asset", key));
        }
    }
    Ok(())
}

fn validate_quote(config: &dyn ConfigPort, section: &str) -> Result<(), IndicatoryError> {
    let date_time = config
        .get_string(section, "date_time")
        .ok_or_else(|| missing(section, "date_time"))?;
    if parse_date_time(&date_time).is_none() {
        return Err(invalid(
            section,
            "date_time",
            "invalid date_time format, expected YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD",
        ));
    }

    for key in QUOTE_KEYS {
        validate_numeric(config, section, key)?;
    }
    let supplied = QUOTE_KEYS
        .iter()
        .filter(|key| config.get_string(section, key).is_some())
        .count();
    if supplied < 2 {
        return Err(invalid(
            section,
            "ask",
            "a quote needs two of ask, bid and spread",
        ));
    }
    Ok(())
}

fn validate_strategy(config: &dyn ConfigPort) -> Result<(), IndicatoryError> {
    let strategy = config
        .get_string("risk", "strategy")
        .unwrap_or_else(|| "plain".to_string());
    match strategy.trim() {
        "plain" => Ok(()),
        "spread_aware" => require(config, "risk", "base_risk_percentage"),
        "stop_loss" => require(config, "risk", "stop_loss"),
        other => Err(invalid(
            "risk",
            "strategy",
            &format!("unknown strategy '{}', expected one of {:?}", other, STRATEGIES),
        )),
    }
}

fn validate_numeric(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), IndicatoryError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match config.get_opt_double(section, key) {
        None => Err(invalid(
            section,
            key,
            &format!("'{}' is not a number", raw.trim()),
        )),
        Some(value) if !value.is_finite() => Err(invalid(
            section,
            key,
            &format!("'{}' is not a finite number", raw.trim()),
        )),
        Some(_) => Ok(()),
    }
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), IndicatoryError> {
    match config.get_string(section, key) {
        Some(_) => Ok(()),
        None => Err(missing(section, key)),
    }
}

fn has_any_key(config: &dyn ConfigPort, section: &str, keys: &[&str]) -> bool {
    keys.iter().any(|key| config.get_string(section, key).is_some())
}

fn missing(section: &str, key: &str) -> IndicatoryError {
    IndicatoryError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> IndicatoryError {
    IndicatoryError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
