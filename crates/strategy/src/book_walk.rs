//! Book-walking market making with inventory skew
//!
//! Buys every ask up to a limit price and sells every bid down to one,
//! then rests the leftover capacity just inside the most popular levels.
//! Once inventory passes a share of the limit, the limit price on that
//! side moves one tick toward flat.

use archipelago_core::{OrderDepth, Price};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::events::{EventSink, Phase, StrategyEvent};
use crate::liquidation::LiquidationTracker;
use crate::orders::{OrderBuilder, round_price};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookWalk {
    /// Share of the limit beyond which prices skew toward flat
    #[serde(default = "default_skew_threshold")]
    pub skew_threshold: Decimal,
    #[serde(default = "default_skew_ticks")]
    pub skew_ticks: Price,
}

fn default_skew_threshold() -> Decimal {
    dec!(0.5)
}

fn default_skew_ticks() -> Price {
    1
}

impl Default for BookWalk {
    fn default() -> Self {
        Self {
            skew_threshold: default_skew_threshold(),
            skew_ticks: default_skew_ticks(),
        }
    }
}

impl BookWalk {
    /// Highest price worth paying and lowest worth selling at
    pub fn limit_prices(&self, true_value: Price, orders: &OrderBuilder) -> (Price, Price) {
        let position = Decimal::from(orders.position());
        let threshold = self.skew_threshold * Decimal::from(orders.limit());

        let max_buy = if position > threshold {
            true_value - self.skew_ticks
        } else {
            true_value
        };
        let min_sell = if position < -threshold {
            true_value + self.skew_ticks
        } else {
            true_value
        };
        (max_buy, min_sell)
    }

    pub fn quote(
        &self,
        depth: &OrderDepth,
        fair_value: Decimal,
        liquidation: &mut LiquidationTracker,
        orders: &mut OrderBuilder,
        sink: &mut dyn EventSink,
    ) {
        let Some(true_value) = round_price(fair_value) else {
            return;
        };
        let (max_buy, min_sell) = self.limit_prices(true_value, orders);

        let signal = liquidation.observe(orders.position(), orders.limit());
        if let Some(mode) = signal.mode() {
            sink.emit(StrategyEvent::Liquidation {
                symbol: orders.symbol().to_string(),
                mode,
                position: orders.position(),
            });
        }
        let soft_offset = liquidation.soft_offset();

        // Buy side
        for (price, volume) in depth.asks() {
            if price > max_buy {
                break;
            }
            orders.buy(price, volume, Phase::Walk);
        }
        if signal.hard {
            let half = orders.buy_capacity() / 2;
            orders.buy(true_value, half, Phase::Liquidate);
        }
        if signal.soft {
            let half = orders.buy_capacity() / 2;
            orders.buy(true_value - soft_offset, half, Phase::Liquidate);
        }
        if orders.buy_capacity() > 0 {
            let price = depth
                .popular_bid()
                .map_or(max_buy, |bid| max_buy.min(bid + 1));
            let volume = orders.buy_capacity();
            orders.buy(price, volume, Phase::Make);
        }

        // Sell side
        for (price, volume) in depth.bids() {
            if price < min_sell {
                break;
            }
            orders.sell(price, volume, Phase::Walk);
        }
        if signal.hard {
            let half = orders.sell_capacity() / 2;
            orders.sell(true_value, half, Phase::Liquidate);
        }
        if signal.soft {
            let half = orders.sell_capacity() / 2;
            orders.sell(true_value + soft_offset, half, Phase::Liquidate);
        }
        if orders.sell_capacity() > 0 {
            let price = depth
                .popular_ask()
                .map_or(min_sell, |ask| min_sell.max(ask - 1));
            let volume = orders.sell_capacity();
            orders.sell(price, volume, Phase::Make);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{LiquidationMode, RecordingSink};
    use crate::liquidation::LiquidationPolicy;
    use archipelago_core::Order;

    fn run(
        depth: &OrderDepth,
        fair_value: Decimal,
        position: i64,
        tracker: &mut LiquidationTracker,
        sink: &mut RecordingSink,
    ) -> Vec<Order> {
        let mut orders = OrderBuilder::new("SQUID_INK", 50, position);
        BookWalk::default().quote(depth, fair_value, tracker, &mut orders, sink);
        orders.orders().cloned().collect()
    }

    #[test]
    fn test_flat_quotes_inside_popular_levels() {
        let depth = OrderDepth::new()
            .with_bid(1998, 20)
            .with_bid(1997, 5)
            .with_ask(2001, 3)
            .with_ask(2002, 20);
        let mut tracker = LiquidationTracker::new(LiquidationPolicy::Disabled);
        let mut sink = RecordingSink::new();

        let out = run(&depth, dec!(2000.2), 0, &mut tracker, &mut sink);
        assert_eq!(
            out,
            vec![
                Order::buy("SQUID_INK", 1999, 50),
                Order::sell("SQUID_INK", 2001, 50),
            ]
        );
    }

    #[test]
    fn test_long_inventory_skews_buy_limit() {
        let depth = OrderDepth::new()
            .with_bid(1997, 10)
            .with_ask(1999, 5)
            .with_ask(2000, 10);
        let mut tracker = LiquidationTracker::new(LiquidationPolicy::Disabled);
        let mut sink = RecordingSink::new();

        let out = run(&depth, dec!(2000), 30, &mut tracker, &mut sink);
        assert_eq!(
            out,
            vec![
                Order::buy("SQUID_INK", 1999, 5),
                Order::buy("SQUID_INK", 1998, 15),
                Order::sell("SQUID_INK", 2000, 80),
            ]
        );
    }

    #[test]
    fn test_hard_liquidation_after_pinned_window() {
        let depth = OrderDepth::new().with_bid(1998, 10).with_ask(2002, 10);
        let mut tracker = LiquidationTracker::new(LiquidationPolicy::pinned_window());
        let mut sink = RecordingSink::new();

        for _ in 0..9 {
            run(&depth, dec!(2000), -50, &mut tracker, &mut sink);
        }
        assert!(sink.liquidations().is_empty());

        let out = run(&depth, dec!(2000), -50, &mut tracker, &mut sink);
        assert_eq!(sink.liquidations(), vec![LiquidationMode::Hard]);
        assert_eq!(
            out,
            vec![
                Order::buy("SQUID_INK", 2000, 50),
                Order::buy("SQUID_INK", 1998, 25),
                Order::buy("SQUID_INK", 1999, 25),
            ]
        );
    }

    #[test]
    fn test_limit_prices_short_skew() {
        let orders = OrderBuilder::new("SQUID_INK", 50, -26);
        assert_eq!(BookWalk::default().limit_prices(2000, &orders), (2000, 2001));
    }
}
