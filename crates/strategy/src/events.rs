//! Strategy Events - Diagnostics emitted while deciding orders
//!
//! Strategies never log directly. They emit [`StrategyEvent`]s into an
//! [`EventSink`] supplied by the caller, which decides where they go:
//! the `log` facade ([`LogSink`]), an in-memory buffer for tests
//! ([`RecordingSink`]), or any closure.

use archipelago_core::{Price, Quantity, Symbol, Timestamp};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::Skip;
use crate::signal::Signal;

/// Which part of a strategy produced an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Crossing mispriced resting orders
    Take,
    /// Flattening inventory at fair value
    Clear,
    /// Resting quotes inside the edge band
    Make,
    /// Walking the book up to the skewed limit price
    Walk,
    /// Forced unwinding after being pinned at the limit
    Liquidate,
    /// Fixed or scaled quotes around fair value
    Quote,
    /// Basket vs components spread entry
    Arbitrage,
    /// Closing a spread position
    Flatten,
    /// Segment momentum decision or hold quotes
    Momentum,
}

/// Liquidation severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiquidationMode {
    Soft,
    Hard,
}

/// Diagnostic emitted by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyEvent {
    /// Positions observed at the start of a tick
    Positions {
        timestamp: Timestamp,
        positions: BTreeMap<Symbol, Quantity>,
    },
    /// Fair value computed for a symbol
    FairValue { symbol: Symbol, value: Decimal },
    /// Order accepted into the output
    OrderPlaced {
        symbol: Symbol,
        phase: Phase,
        price: Price,
        quantity: Quantity,
    },
    /// No orders for this symbol this tick
    TickSkipped { symbol: Symbol, reason: Skip },
    /// Liquidation triggered after sustained pinning
    Liquidation {
        symbol: Symbol,
        mode: LiquidationMode,
        position: Quantity,
    },
    /// Spread signal evaluation
    SpreadSignal {
        symbol: Symbol,
        spread: Decimal,
        z_score: Option<Decimal>,
        signal: Signal,
    },
}

impl StrategyEvent {
    /// Symbol this event relates to (`None` for the positions summary)
    pub fn symbol(&self) -> Option<&str> {
        match self {
            StrategyEvent::Positions { .. } => None,
            StrategyEvent::FairValue { symbol, .. }
            | StrategyEvent::OrderPlaced { symbol, .. }
            | StrategyEvent::TickSkipped { symbol, .. }
            | StrategyEvent::Liquidation { symbol, .. }
            | StrategyEvent::SpreadSignal { symbol, .. } => Some(symbol),
        }
    }
}

/// Destination for strategy events
pub trait EventSink {
    fn emit(&mut self, event: StrategyEvent);
}

impl<F: FnMut(StrategyEvent)> EventSink for F {
    fn emit(&mut self, event: StrategyEvent) {
        self(event)
    }
}

/// Forwards events to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: StrategyEvent) {
        match event {
            StrategyEvent::Positions {
                timestamp,
                positions,
            } => {
                log::debug!("[{}] positions {:?}", timestamp, positions);
            }
            StrategyEvent::FairValue { symbol, value } => {
                log::debug!("[{}] fair value {}", symbol, value);
            }
            StrategyEvent::OrderPlaced {
                symbol,
                phase,
                price,
                quantity,
            } => {
                let side = if quantity > 0 { "BUY" } else { "SELL" };
                log::info!(
                    "[{}] {:?} {} {} @ {}",
                    symbol,
                    phase,
                    side,
                    quantity.abs(),
                    price
                );
            }
            StrategyEvent::TickSkipped { symbol, reason } => {
                log::debug!("[{}] skipped: {}", symbol, reason);
            }
            StrategyEvent::Liquidation {
                symbol,
                mode,
                position,
            } => {
                log::warn!(
                    "[{}] {:?} liquidation at position {}",
                    symbol,
                    mode,
                    position
                );
            }
            StrategyEvent::SpreadSignal {
                symbol,
                spread,
                z_score,
                signal,
            } => {
                log::debug!(
                    "[{}] spread {} z={:?} -> {:?}",
                    symbol,
                    spread,
                    z_score,
                    signal
                );
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<StrategyEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip reasons recorded for a symbol
    pub fn skips_for(&self, symbol: &str) -> Vec<&Skip> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StrategyEvent::TickSkipped { symbol: s, reason } if s == symbol => Some(reason),
                _ => None,
            })
            .collect()
    }

    /// Phases of the orders placed for a symbol, in emission order
    pub fn phases_for(&self, symbol: &str) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StrategyEvent::OrderPlaced {
                    symbol: s, phase, ..
                } if s == symbol => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// Last fair value recorded for a symbol
    pub fn fair_value(&self, symbol: &str) -> Option<Decimal> {
        self.events.iter().rev().find_map(|e| match e {
            StrategyEvent::FairValue { symbol: s, value } if s == symbol => Some(*value),
            _ => None,
        })
    }

    pub fn liquidations(&self) -> Vec<LiquidationMode> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StrategyEvent::Liquidation { mode, .. } => Some(*mode),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: StrategyEvent) {
        self.events.push(event);
    }
}
