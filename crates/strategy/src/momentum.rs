//! Segment Momentum
//!
//! Every `interval` ticks, compare the mid with the one recorded at the
//! previous decision. A large move triggers a taker order; otherwise the
//! strategy quotes one tick inside the touch.

use archipelago_core::{Order, Quantity, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidConfig, Skip};
use crate::events::{EventSink, Phase};
use crate::orders::OrderBuilder;
use crate::strategy::{Strategy, StrategyState, TickContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMomentumConfig {
    pub symbol: Symbol,
    /// Ticks between decisions
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Mid move that triggers a trade
    #[serde(default = "default_threshold")]
    pub threshold: Decimal,
    /// Size of the hold quotes
    #[serde(default = "default_quote_size")]
    pub quote_size: Quantity,
}

fn default_interval() -> u64 {
    100
}

fn default_threshold() -> Decimal {
    dec!(10)
}

fn default_quote_size() -> Quantity {
    20
}

impl SegmentMomentumConfig {
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: default_interval(),
            threshold: default_threshold(),
            quote_size: default_quote_size(),
        }
    }

    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.interval == 0 {
            return Err(InvalidConfig::new(self.symbol.clone(), "interval must be positive"));
        }
        if self.threshold.is_sign_negative() || self.quote_size < 0 {
            return Err(InvalidConfig::new(
                self.symbol.clone(),
                "threshold and quote size must be non-negative",
            ));
        }
        Ok(())
    }
}

pub struct SegmentMomentum {
    config: SegmentMomentumConfig,
    segment_mid: Option<Decimal>,
    last_decision: u64,
    state: StrategyState,
}

impl SegmentMomentum {
    pub fn new(config: SegmentMomentumConfig) -> Self {
        Self {
            config,
            segment_mid: None,
            last_decision: 0,
            state: StrategyState::default(),
        }
    }
}

impl Strategy for SegmentMomentum {
    fn name(&self) -> &str {
        "SegmentMomentum"
    }

    fn symbol(&self) -> &str {
        &self.config.symbol
    }

    fn on_tick(
        &mut self,
        ctx: &TickContext<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<Order>, Skip> {
        let tick = self.state.advance();

        let depth = ctx.depth()?;
        let missing = || Skip::MissingMidPrice(ctx.symbol.to_string());
        let (bid, bid_volume) = depth.best_bid().ok_or_else(missing)?;
        let (ask, ask_volume) = depth.best_ask().ok_or_else(missing)?;
        let mid = depth.mid_price().ok_or_else(missing)?;

        let segment_mid = *self.segment_mid.get_or_insert(mid);
        if tick - self.last_decision < self.config.interval {
            return Ok(Vec::new());
        }
        self.last_decision = tick;
        self.segment_mid = Some(mid);

        let delta = segment_mid - mid;
        let mut orders = OrderBuilder::for_context(ctx);
        if delta > self.config.threshold {
            orders.buy(ask, ask_volume, Phase::Momentum);
        } else if delta < -self.config.threshold {
            orders.sell(bid, bid_volume, Phase::Momentum);
        } else {
            orders.buy(bid + 1, self.config.quote_size, Phase::Momentum);
            orders.sell(ask - 1, self.config.quote_size, Phase::Momentum);
        }
        Ok(orders.finish(sink))
    }

    fn state(&self) -> &StrategyState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use archipelago_core::{OrderDepth, TradingState};

    fn state_at(mid: i64) -> TradingState {
        TradingState::new(0).with_depth(
            "SQUID_INK",
            OrderDepth::new().with_bid(mid - 2, 15).with_ask(mid + 2, 12),
        )
    }

    fn strategy(interval: u64) -> SegmentMomentum {
        SegmentMomentum::new(SegmentMomentumConfig {
            interval,
            ..SegmentMomentumConfig::new("SQUID_INK")
        })
    }

    fn tick(strategy: &mut SegmentMomentum, mid: i64) -> Vec<Order> {
        let state = state_at(mid);
        let ctx = TickContext::new(&state, "SQUID_INK", 50);
        strategy.run(&ctx, &mut RecordingSink::new())
    }

    #[test]
    fn test_quiet_between_decisions() {
        let mut s = strategy(3);
        assert!(tick(&mut s, 2000).is_empty());
        assert!(tick(&mut s, 2000).is_empty());
        assert!(!tick(&mut s, 2000).is_empty());
        assert!(tick(&mut s, 2000).is_empty());
    }

    #[test]
    fn test_drop_buys_at_ask() {
        let mut s = strategy(2);
        tick(&mut s, 2000);
        let orders = tick(&mut s, 1980);
        assert_eq!(orders, vec![Order::buy("SQUID_INK", 1982, 12)]);
    }

    #[test]
    fn test_rise_sells_at_bid() {
        let mut s = strategy(2);
        tick(&mut s, 2000);
        let orders = tick(&mut s, 2020);
        assert_eq!(orders, vec![Order::sell("SQUID_INK", 2018, 15)]);
    }

    #[test]
    fn test_flat_segment_quotes_inside_touch() {
        let mut s = strategy(2);
        tick(&mut s, 2000);
        let orders = tick(&mut s, 2005);
        assert_eq!(
            orders,
            vec![
                Order::buy("SQUID_INK", 2004, 20),
                Order::sell("SQUID_INK", 2006, 20),
            ]
        );
    }

    #[test]
    fn test_segment_resets_after_decision() {
        let mut s = strategy(2);
        tick(&mut s, 2000);
        assert_eq!(tick(&mut s, 2012).len(), 1);
        tick(&mut s, 2014);
        // Compared against 2012, not 2000
        let orders = tick(&mut s, 2015);
        assert_eq!(orders.len(), 2);
    }
}
