use thiserror::Error;

use crate::PriceColumn;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Schema error: required column '{column}' is missing from the price data")]
    Schema { column: PriceColumn },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Insufficient history: need at least {required} defined trailing points, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
