//! Per-tick market snapshot delivered by the matching engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::OrderDepth;
use crate::entities::{Listing, Trade};
use crate::values::{Quantity, Symbol, Timestamp};

/// Everything the engine sees on one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingState {
    pub timestamp: Timestamp,
    /// Opaque string carried over from the previous tick's output
    #[serde(default)]
    pub trader_data: String,
    #[serde(default)]
    pub listings: BTreeMap<Symbol, Listing>,
    #[serde(default)]
    pub order_depths: BTreeMap<Symbol, OrderDepth>,
    #[serde(default)]
    pub own_trades: BTreeMap<Symbol, Vec<Trade>>,
    #[serde(default)]
    pub market_trades: BTreeMap<Symbol, Vec<Trade>>,
    /// Signed inventory per symbol; absent means flat
    #[serde(default)]
    pub position: BTreeMap<Symbol, Quantity>,
}

impl TradingState {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }

    /// Builder-style order depth insert
    pub fn with_depth(mut self, symbol: impl Into<Symbol>, depth: OrderDepth) -> Self {
        self.order_depths.insert(symbol.into(), depth);
        self
    }

    /// Builder-style position insert
    pub fn with_position(mut self, symbol: impl Into<Symbol>, position: Quantity) -> Self {
        self.position.insert(symbol.into(), position);
        self
    }

    pub fn depth(&self, symbol: &str) -> Option<&OrderDepth> {
        self.order_depths.get(symbol)
    }

    /// Current position for a symbol (0 if none reported)
    pub fn position(&self, symbol: &str) -> Quantity {
        self.position.get(symbol).copied().unwrap_or(0)
    }

    /// Touch midpoint for any symbol in the snapshot
    pub fn mid_price(&self, symbol: &str) -> Option<Decimal> {
        self.depth(symbol)?.mid_price()
    }

    /// Midpoint of the highest-volume levels for any symbol in the snapshot
    pub fn popular_mid(&self, symbol: &str) -> Option<Decimal> {
        self.depth(symbol)?.popular_mid()
    }

    /// Most recent market trade for a symbol
    pub fn last_market_trade(&self, symbol: &str) -> Option<&Trade> {
        self.market_trades.get(symbol)?.last()
    }
}
