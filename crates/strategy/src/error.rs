//! Strategy errors
//!
//! Nothing here is ever surfaced to the matching engine. A [`Skip`] means
//! "emit nothing for this symbol on this tick"; [`InvalidConfig`] is only
//! raised while building strategies.

use archipelago_core::Symbol;
use thiserror::Error;

/// Reason a strategy emitted no orders this tick
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    #[error("no order depth for {0}")]
    NoOrderDepth(Symbol),

    #[error("order book for {0} is empty")]
    EmptyBook(Symbol),

    #[error("no mid price for {0}")]
    MissingMidPrice(Symbol),

    #[error("insufficient history: {have} of {need} observations")]
    InsufficientHistory { have: usize, need: usize },

    #[error("degenerate statistics: {0}")]
    Degenerate(&'static str),
}

/// Coarse grouping of skip reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipKind {
    MissingMarketData,
    InsufficientHistory,
    DegenerateStatistics,
}

impl Skip {
    pub fn kind(&self) -> SkipKind {
        match self {
            Skip::NoOrderDepth(_) | Skip::EmptyBook(_) | Skip::MissingMidPrice(_) => {
                SkipKind::MissingMarketData
            }
            Skip::InsufficientHistory { .. } => SkipKind::InsufficientHistory,
            Skip::Degenerate(_) => SkipKind::DegenerateStatistics,
        }
    }
}

/// Strategy configuration rejected at construction time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid configuration for {symbol}: {reason}")]
pub struct InvalidConfig {
    pub symbol: Symbol,
    pub reason: String,
}

impl InvalidConfig {
    pub fn new(symbol: impl Into<Symbol>, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_kinds() {
        assert_eq!(
            Skip::EmptyBook("KELP".into()).kind(),
            SkipKind::MissingMarketData
        );
        assert_eq!(
            Skip::InsufficientHistory { have: 3, need: 30 }.kind(),
            SkipKind::InsufficientHistory
        );
        assert_eq!(
            Skip::Degenerate("zero std dev").kind(),
            SkipKind::DegenerateStatistics
        );
    }

    #[test]
    fn test_skip_display() {
        let skip = Skip::InsufficientHistory { have: 3, need: 30 };
        assert_eq!(skip.to_string(), "insufficient history: 3 of 30 observations");
    }
}
