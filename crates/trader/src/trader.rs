//! Per-tick dispatcher
//!
//! Holds one strategy per configured symbol and routes every snapshot to
//! each of them in configuration order.

use archipelago_core::{Order, Quantity, Symbol, TradingState};
use archipelago_strategy::{EventSink, LogSink, Strategy, StrategyEvent, TickContext};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::TraderConfig;
use crate::error::{ConfigError, Result};

/// Everything returned to the matching engine for one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderOutput {
    /// Orders per symbol, only for symbols present in the snapshot
    pub orders: BTreeMap<Symbol, Vec<Order>>,
    /// Conversion requests (always 0)
    pub conversions: i64,
    /// Opaque state handed back on the next tick (always empty)
    pub trader_data: String,
}

impl TraderOutput {
    /// Orders for a symbol (empty if none)
    pub fn orders_for(&self, symbol: &str) -> &[Order] {
        self.orders.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_orders(&self) -> usize {
        self.orders.values().map(Vec::len).sum()
    }
}

struct Slot {
    strategy: Box<dyn Strategy>,
    limit: Quantity,
}

/// Strategy dispatcher
pub struct Trader<S: EventSink = LogSink> {
    slots: Vec<Slot>,
    sink: S,
}

impl Trader<LogSink> {
    /// Build from configuration, logging events through the `log` facade
    pub fn from_config(config: TraderConfig) -> Result<Self> {
        Self::new(config, LogSink)
    }
}

impl<S: EventSink> Trader<S> {
    /// Validate `config` and build one strategy per entry
    pub fn new(config: TraderConfig, sink: S) -> Result<Self> {
        config.validate_layout()?;

        let mut slots = Vec::with_capacity(config.strategies.len());
        for strategy_config in &config.strategies {
            let symbol = strategy_config.symbol();
            let limit = config
                .limit(symbol)
                .ok_or_else(|| ConfigError::MissingLimit(symbol.to_string()))?;
            let strategy = strategy_config.build()?;
            debug!(
                "Configured {} for {} (limit {})",
                strategy.name(),
                symbol,
                limit
            );
            slots.push(Slot { strategy, limit });
        }

        info!("Trader ready with {} strategies", slots.len());
        Ok(Self { slots, sink })
    }

    /// Symbols handled, in dispatch order
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.iter().map(|s| s.strategy.symbol())
    }

    /// Strategy trading `symbol`
    pub fn strategy(&self, symbol: &str) -> Option<&dyn Strategy> {
        self.slots
            .iter()
            .find(|s| s.strategy.symbol() == symbol)
            .map(|s| s.strategy.as_ref())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Decide this tick's orders
    pub fn run(&mut self, state: &TradingState) -> TraderOutput {
        self.sink.emit(StrategyEvent::Positions {
            timestamp: state.timestamp,
            positions: state.position.clone(),
        });

        let mut orders = BTreeMap::new();
        for slot in &mut self.slots {
            let symbol = slot.strategy.symbol().to_string();
            if state.depth(&symbol).is_none() {
                continue;
            }
            let ctx = TickContext::new(state, &symbol, slot.limit);
            let placed = slot.strategy.run(&ctx, &mut self.sink);
            orders.insert(symbol, placed);
        }

        TraderOutput {
            orders,
            conversions: 0,
            trader_data: String::new(),
        }
    }

    /// JSON in, JSON out
    pub fn run_json(&mut self, state_json: &str) -> serde_json::Result<String> {
        let state: TradingState = serde_json::from_str(state_json)?;
        serde_json::to_string(&self.run(&state))
    }
}
