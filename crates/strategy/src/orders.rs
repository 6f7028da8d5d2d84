//! Capacity-aware order accumulation
//!
//! Every order a strategy emits goes through an [`OrderBuilder`], which
//! clamps it so that even if all of this tick's orders filled, the
//! position would stay within `[-limit, limit]`.

use archipelago_core::{Order, Price, Quantity, Symbol, buy_capacity, sell_capacity};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::events::{EventSink, Phase, StrategyEvent};
use crate::strategy::TickContext;

#[derive(Debug, Clone)]
pub struct OrderBuilder {
    symbol: Symbol,
    limit: Quantity,
    position: Quantity,
    buy_volume: Quantity,
    sell_volume: Quantity,
    placed: Vec<(Order, Phase)>,
}

impl OrderBuilder {
    pub fn new(symbol: impl Into<Symbol>, limit: Quantity, position: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            limit: limit.abs(),
            position,
            buy_volume: 0,
            sell_volume: 0,
            placed: Vec::new(),
        }
    }

    pub fn for_context(ctx: &TickContext<'_>) -> Self {
        Self::new(ctx.symbol, ctx.limit, ctx.position())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn limit(&self) -> Quantity {
        self.limit
    }

    /// Position reported at the start of the tick
    pub fn position(&self) -> Quantity {
        self.position
    }

    pub fn buy_volume(&self) -> Quantity {
        self.buy_volume
    }

    pub fn sell_volume(&self) -> Quantity {
        self.sell_volume
    }

    /// Remaining room to buy: `limit - position - bought`
    pub fn buy_capacity(&self) -> Quantity {
        buy_capacity(self.limit, self.position + self.buy_volume)
    }

    /// Remaining room to sell: `limit + position - sold`
    pub fn sell_capacity(&self) -> Quantity {
        sell_capacity(self.limit, self.position - self.sell_volume)
    }

    /// Position if every order so far filled
    pub fn net_position(&self) -> Quantity {
        self.position + self.buy_volume - self.sell_volume
    }

    /// Queue a buy, clamped to capacity. Returns the quantity accepted.
    pub fn buy(&mut self, price: Price, quantity: Quantity, phase: Phase) -> Quantity {
        let quantity = quantity.min(self.buy_capacity());
        if quantity <= 0 {
            return 0;
        }
        self.buy_volume += quantity;
        self.placed
            .push((Order::buy(self.symbol.clone(), price, quantity), phase));
        quantity
    }

    /// Queue a sell, clamped to capacity. Returns the quantity accepted.
    pub fn sell(&mut self, price: Price, quantity: Quantity, phase: Phase) -> Quantity {
        let quantity = quantity.min(self.sell_capacity());
        if quantity <= 0 {
            return 0;
        }
        self.sell_volume += quantity;
        self.placed
            .push((Order::sell(self.symbol.clone(), price, quantity), phase));
        quantity
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Orders queued so far
    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.placed.iter().map(|(o, _)| o)
    }

    /// Emit one event per order and hand back the order list
    pub fn finish(self, sink: &mut dyn EventSink) -> Vec<Order> {
        self.placed
            .into_iter()
            .map(|(order, phase)| {
                sink.emit(StrategyEvent::OrderPlaced {
                    symbol: order.symbol.clone(),
                    phase,
                    price: order.price,
                    quantity: order.quantity,
                });
                order
            })
            .collect()
    }
}

// === Price rounding ===

pub fn floor_price(value: Decimal) -> Option<Price> {
    value.floor().to_i64()
}

pub fn ceil_price(value: Decimal) -> Option<Price> {
    value.ceil().to_i64()
}

/// Round half to even
pub fn round_price(value: Decimal) -> Option<Price> {
    value.round().to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use rust_decimal_macros::dec;

    #[test]
    fn test_buy_clamped_to_capacity() {
        let mut orders = OrderBuilder::new("KELP", 50, 40);
        assert_eq!(orders.buy(2020, 25, Phase::Take), 10);
        assert_eq!(orders.buy(2021, 5, Phase::Make), 0);
        assert_eq!(orders.buy_capacity(), 0);
        assert_eq!(orders.net_position(), 50);
    }

    #[test]
    fn test_sell_capacity_includes_long_position() {
        let mut orders = OrderBuilder::new("KELP", 50, 40);
        assert_eq!(orders.sell_capacity(), 90);
        assert_eq!(orders.sell(2025, 100, Phase::Make), 90);
        assert_eq!(orders.net_position(), -50);
    }

    #[test]
    fn test_capacity_tracks_both_sides_independently() {
        let mut orders = OrderBuilder::new("KELP", 50, -20);
        assert_eq!(orders.buy_capacity(), 70);
        assert_eq!(orders.sell_capacity(), 30);

        orders.buy(2020, 60, Phase::Take);
        orders.sell(2025, 10, Phase::Make);
        assert_eq!(orders.buy_capacity(), 10);
        assert_eq!(orders.sell_capacity(), 20);
        assert_eq!(orders.net_position(), 30);
    }

    #[test]
    fn test_zero_quantity_not_queued() {
        let mut orders = OrderBuilder::new("KELP", 50, 0);
        assert_eq!(orders.buy(2020, 0, Phase::Take), 0);
        assert_eq!(orders.sell(2020, -3, Phase::Take), 0);
        assert!(orders.is_empty());
    }

    #[test]
    fn test_finish_emits_events() {
        let mut orders = OrderBuilder::new("KELP", 50, 0);
        orders.buy(2020, 5, Phase::Take);
        orders.sell(2025, 7, Phase::Make);

        let mut sink = RecordingSink::new();
        let out = orders.finish(&mut sink);
        assert_eq!(out, vec![Order::buy("KELP", 2020, 5), Order::sell("KELP", 2025, 7)]);
        assert_eq!(sink.phases_for("KELP"), vec![Phase::Take, Phase::Make]);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(floor_price(dec!(99.5)), Some(99));
        assert_eq!(ceil_price(dec!(99.5)), Some(100));
        assert_eq!(round_price(dec!(2.5)), Some(2));
        assert_eq!(round_price(dec!(3.5)), Some(4));
        assert_eq!(floor_price(dec!(-0.5)), Some(-1));
    }
}
