//! Trader errors

use archipelago_core::{Quantity, Symbol};
use archipelago_strategy::InvalidConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("No position limit configured for {0}")]
    MissingLimit(Symbol),

    #[error("Position limit for {symbol} must be positive, got {limit}")]
    NonPositiveLimit { symbol: Symbol, limit: Quantity },

    #[error("More than one strategy configured for {0}")]
    DuplicateStrategy(Symbol),

    #[error(transparent)]
    InvalidStrategy(#[from] InvalidConfig),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
