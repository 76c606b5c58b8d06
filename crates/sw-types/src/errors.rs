use thiserror::Error;

/// Main error type for Stablewatch
#[derive(Error, Debug)]
pub enum SwError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Instrument and price-series errors
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Unknown instrument: {symbol}")]
    UnknownInstrument { symbol: String },

    #[error("Instrument {symbol} not supported by provider {provider}")]
    UnsupportedInstrument { symbol: String, provider: String },

    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    #[error("Invalid peg series: {message}")]
    InvalidSeries { message: String },
}

/// Hypothetical scenario errors
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Scenario event must not be empty")]
    EmptyEvent,

    #[error("Risk score change {delta} outside allowed range {min}..={max}")]
    DeltaOutOfRange { delta: i32, min: i32, max: i32 },

    #[error("Scenario not found: {event}")]
    NotFound { event: String },
}

/// Result type alias for Stablewatch operations
pub type SwResult<T> = Result<T, SwError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::SwError::Validation(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::SwError::Config(format!($($arg)*))
    };
}
