//! Strategy selection
//!
//! Each configured symbol names one strategy kind and its parameters:
//!
//! ```json
//! { "strategy": "market_maker", "symbol": "KELP",
//!   "fair_value": { "type": "filtered_midpoint", "min_volume": 15 },
//!   "quoting": { "type": "take_clear_make", "take_width": 1, "edge_width": 1 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::basket::{BasketArbitrage, BasketArbitrageConfig, ComponentSpread, ComponentSpreadConfig};
use crate::error::InvalidConfig;
use crate::market_maker::{MarketMaker, MarketMakerConfig};
use crate::momentum::{SegmentMomentum, SegmentMomentumConfig};
use crate::strategy::Strategy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyConfig {
    MarketMaker(MarketMakerConfig),
    BasketArbitrage(BasketArbitrageConfig),
    ComponentSpread(ComponentSpreadConfig),
    SegmentMomentum(SegmentMomentumConfig),
}

impl StrategyConfig {
    /// Symbol the configured strategy trades
    pub fn symbol(&self) -> &str {
        match self {
            StrategyConfig::MarketMaker(c) => &c.symbol,
            StrategyConfig::BasketArbitrage(c) => &c.recipe.basket,
            StrategyConfig::ComponentSpread(c) => &c.symbol,
            StrategyConfig::SegmentMomentum(c) => &c.symbol,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidConfig> {
        match self {
            StrategyConfig::MarketMaker(c) => c.validate(),
            StrategyConfig::BasketArbitrage(c) => c.validate(),
            StrategyConfig::ComponentSpread(c) => c.validate(),
            StrategyConfig::SegmentMomentum(c) => c.validate(),
        }
    }

    /// Validate and instantiate
    pub fn build(&self) -> Result<Box<dyn Strategy>, InvalidConfig> {
        self.validate()?;
        let strategy: Box<dyn Strategy> = match self {
            StrategyConfig::MarketMaker(c) => Box::new(MarketMaker::new(c.clone())),
            StrategyConfig::BasketArbitrage(c) => Box::new(BasketArbitrage::new(c.clone())),
            StrategyConfig::ComponentSpread(c) => Box::new(ComponentSpread::new(c.clone())),
            StrategyConfig::SegmentMomentum(c) => Box::new(SegmentMomentum::new(c.clone())),
        };
        Ok(strategy)
    }
}

impl From<MarketMakerConfig> for StrategyConfig {
    fn from(config: MarketMakerConfig) -> Self {
        StrategyConfig::MarketMaker(config)
    }
}

impl From<BasketArbitrageConfig> for StrategyConfig {
    fn from(config: BasketArbitrageConfig) -> Self {
        StrategyConfig::BasketArbitrage(config)
    }
}

impl From<ComponentSpreadConfig> for StrategyConfig {
    fn from(config: ComponentSpreadConfig) -> Self {
        StrategyConfig::ComponentSpread(config)
    }
}

impl From<SegmentMomentumConfig> for StrategyConfig {
    fn from(config: SegmentMomentumConfig) -> Self {
        StrategyConfig::SegmentMomentum(config)
    }
}
