use std::collections::BTreeSet;
use std::path::Path;

use super::types::TraderConfig;
use crate::error::{ConfigError, Result};

/// Load trader configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TraderConfig> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<TraderConfig> {
    let config: TraderConfig = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<TraderConfig> {
    let default_config = include_str!("default_trader.json");
    load_config_from_str(default_config)
}

impl TraderConfig {
    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_config(path)
    }

    /// Load from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        load_config_from_str(json)
    }

    /// Validate limits, strategy placement and every strategy's parameters
    pub fn validate(&self) -> Result<()> {
        self.validate_layout()?;
        for strategy in &self.strategies {
            strategy.validate()?;
        }
        Ok(())
    }

    /// Limits are positive and each strategy has its own limited symbol
    ///
    /// Strategy parameters are left to `StrategyConfig::build`.
    pub(crate) fn validate_layout(&self) -> Result<()> {
        for (symbol, limit) in self.limits.iter() {
            if *limit <= 0 {
                return Err(ConfigError::NonPositiveLimit {
                    symbol: symbol.clone(),
                    limit: *limit,
                });
            }
        }

        let mut seen = BTreeSet::new();
        for strategy in &self.strategies {
            let symbol = strategy.symbol();
            if !self.limits.contains(symbol) {
                return Err(ConfigError::MissingLimit(symbol.to_string()));
            }
            if !seen.insert(symbol) {
                return Err(ConfigError::DuplicateStrategy(symbol.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archipelago_core::PositionLimits;
    use archipelago_strategy::{MarketMakerConfig, SegmentMomentumConfig};

    #[test]
    fn test_load_default_config() {
        let config = load_default_config().unwrap();
        assert!(!config.strategies.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_default_config_covers_products() {
        let config = load_default_config().unwrap();
        assert_eq!(config.limit("RAINFOREST_RESIN"), Some(50));
        assert_eq!(config.limit("JAMS"), Some(350));
        assert_eq!(config.limit("VOLCANIC_ROCK_VOUCHER_10500"), Some(200));

        let symbols: Vec<&str> = config.symbols().collect();
        assert_eq!(symbols.first(), Some(&"RAINFOREST_RESIN"));
        assert!(symbols.contains(&"PICNIC_BASKET1"));
        assert!(config.strategy_for("VOLCANIC_ROCK_VOUCHER_9500").is_some());
    }

    #[test]
    fn test_missing_limit() {
        let config = TraderConfig::new(PositionLimits::new())
            .with_strategy(MarketMakerConfig::default());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingLimit(symbol)) if symbol == "RAINFOREST_RESIN"
        ));
    }

    #[test]
    fn test_duplicate_strategy() {
        let config = TraderConfig::new(PositionLimits::new().with("RAINFOREST_RESIN", 50))
            .with_strategy(MarketMakerConfig::default())
            .with_strategy(SegmentMomentumConfig::new("RAINFOREST_RESIN"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateStrategy(_))
        ));
    }

    #[test]
    fn test_non_positive_limit() {
        let config = TraderConfig::new(PositionLimits::new().with("KELP", 0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveLimit { limit: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_strategy_parameters() {
        let mut momentum = SegmentMomentumConfig::new("SQUID_INK");
        momentum.interval = 0;
        let config = TraderConfig::new(PositionLimits::new().with("SQUID_INK", 50))
            .with_strategy(momentum);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStrategy(_))
        ));
    }

    #[test]
    fn test_layout_check_leaves_parameters_to_build() {
        let mut momentum = SegmentMomentumConfig::new("SQUID_INK");
        momentum.interval = 0;
        let config = TraderConfig::new(PositionLimits::new().with("SQUID_INK", 50))
            .with_strategy(momentum);
        assert!(config.validate_layout().is_ok());
        assert!(config.strategies[0].build().is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            load_config_from_str("{not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            TraderConfig::from_file("/nonexistent/trader.json"),
            Err(ConfigError::IoError(_))
        ));
    }
}
