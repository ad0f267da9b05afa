//! Domain error types.

/// Top-level error type for indicatory.
#[derive(Debug, thiserror::Error)]
pub enum IndicatoryError {
    #[error("invalid price quote: {reason}")]
    InvalidQuote { reason: String },

    #[error("invalid risk spec {pattern}: {reason}")]
    InvalidRiskSpec { pattern: String, reason: String },

    #[error("invalid leverage: {reason}")]
    InvalidLeverage { reason: String },

    #[error("invalid stop loss {stop_loss}: {reason}")]
    InvalidStopLoss { stop_loss: f64, reason: String },

    #[error("division by zero while computing {operation}")]
    DivisionByZero { operation: &'static str },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {code} on {exchange}")]
    NoData { code: String, exchange: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&IndicatoryError> for std::process::ExitCode {
    fn from(err: &IndicatoryError) -> Self {
        let code: u8 = match err {
            IndicatoryError::Io(_) | IndicatoryError::Json(_) => 1,
            IndicatoryError::ConfigParse { .. }
            | IndicatoryError::ConfigMissing { .. }
            | IndicatoryError::ConfigInvalid { .. } => 2,
            IndicatoryError::Data { .. } | IndicatoryError::NoData { .. } => 3,
            IndicatoryError::InvalidQuote { .. }
            | IndicatoryError::InvalidRiskSpec { .. }
            | IndicatoryError::InvalidLeverage { .. }
            | IndicatoryError::InvalidStopLoss { .. } => 4,
            IndicatoryError::DivisionByZero { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
