use archipelago_core::{PositionLimits, Quantity};
use archipelago_strategy::StrategyConfig;
use serde::{Deserialize, Serialize};

/// Everything needed to build a [`Trader`](crate::Trader)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Absolute position limit per symbol
    pub limits: PositionLimits,
    /// Strategies in dispatch order
    #[serde(default)]
    pub strategies: Vec<StrategyConfig>,
}

impl TraderConfig {
    pub fn new(limits: PositionLimits) -> Self {
        Self {
            limits,
            strategies: Vec::new(),
        }
    }

    /// Builder-style strategy append
    pub fn with_strategy(mut self, strategy: impl Into<StrategyConfig>) -> Self {
        self.strategies.push(strategy.into());
        self
    }

    pub fn limit(&self, symbol: &str) -> Option<Quantity> {
        self.limits.get(symbol)
    }

    /// Traded symbols in dispatch order
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.strategies.iter().map(StrategyConfig::symbol)
    }

    pub fn strategy_for(&self, symbol: &str) -> Option<&StrategyConfig> {
        self.strategies.iter().find(|s| s.symbol() == symbol)
    }
}
