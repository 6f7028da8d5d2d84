//! Strategy Trait and Tick Context
//!
//! Defines the interface every per-symbol strategy implements and the
//! read-only view of the market it receives on each tick.

use archipelago_core::{Order, OrderDepth, Quantity, Symbol, Timestamp, TradingState};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::basket::PriceReference;
use crate::error::Skip;
use crate::events::{EventSink, StrategyEvent};

/// Context provided to a strategy on each tick
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    /// Full snapshot, shared by every strategy on this tick
    pub state: &'a TradingState,
    /// Symbol the strategy trades
    pub symbol: &'a str,
    /// Absolute position limit for that symbol
    pub limit: Quantity,
}

impl<'a> TickContext<'a> {
    pub fn new(state: &'a TradingState, symbol: &'a str, limit: Quantity) -> Self {
        Self {
            state,
            symbol,
            limit,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.state.timestamp
    }

    /// Order depth for the traded symbol
    pub fn depth(&self) -> Result<&'a OrderDepth, Skip> {
        self.depth_of(self.symbol)
    }

    /// Order depth for any symbol in the snapshot
    pub fn depth_of(&self, symbol: &str) -> Result<&'a OrderDepth, Skip> {
        self.state
            .depth(symbol)
            .ok_or_else(|| Skip::NoOrderDepth(symbol.to_string()))
    }

    /// Current position in the traded symbol
    pub fn position(&self) -> Quantity {
        self.state.position(self.symbol)
    }

    /// Reference mid price for any symbol in the snapshot
    pub fn mid(&self, symbol: &str, reference: PriceReference) -> Result<Decimal, Skip> {
        let depth = self.depth_of(symbol)?;
        let mid = match reference {
            PriceReference::Touch => depth.mid_price(),
            PriceReference::Popular => depth.popular_mid(),
        };
        mid.ok_or_else(|| Skip::MissingMidPrice(symbol.to_string()))
    }
}

/// Mutable bookkeeping shared by all strategy kinds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyState {
    /// Ticks seen by this strategy (incremented before any decision)
    pub tick: u64,
    /// Price at which the current spread position was opened
    pub entry_price: Option<Decimal>,
    /// Component inventory that would hedge the current basket position
    pub hedge_targets: BTreeMap<Symbol, Quantity>,
}

impl StrategyState {
    /// Advance the tick counter, returning the new value
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Strategy trait - one instance per traded symbol
///
/// `on_tick` returns `Err(Skip)` whenever market data or history is not
/// sufficient; [`Strategy::run`] turns that into an empty order list plus a
/// [`StrategyEvent::TickSkipped`] diagnostic.
pub trait Strategy: Send {
    /// Strategy name for logging
    fn name(&self) -> &str;

    /// Symbol this strategy emits orders for
    fn symbol(&self) -> &str;

    /// Decide this tick's orders
    fn on_tick(
        &mut self,
        ctx: &TickContext<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<Order>, Skip>;

    /// Bookkeeping carried between ticks
    fn state(&self) -> &StrategyState;

    /// Run one tick, never failing
    fn run(&mut self, ctx: &TickContext<'_>, sink: &mut dyn EventSink) -> Vec<Order> {
        match self.on_tick(ctx, sink) {
            Ok(orders) => orders,
            Err(reason) => {
                sink.emit(StrategyEvent::TickSkipped {
                    symbol: ctx.symbol.to_string(),
                    reason,
                });
                Vec::new()
            }
        }
    }
}
