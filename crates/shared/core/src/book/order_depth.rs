//! Order Depth Snapshot
//!
//! Read-only view of the resting interest for one symbol at one tick, as
//! delivered by the matching engine. Buy volume is stored positive, sell
//! volume negative, matching the exchange's wire convention.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::values::{Price, Quantity};

/// Order depth for a single symbol
///
/// Uses BTreeMap for price levels to keep them sorted.
/// Best bid is the highest buy key, best ask the lowest sell key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDepth {
    /// Bid levels: price -> resting volume (positive)
    #[serde(default)]
    pub buy_orders: BTreeMap<Price, Quantity>,
    /// Ask levels: price -> resting volume (negative)
    #[serde(default)]
    pub sell_orders: BTreeMap<Price, Quantity>,
}

impl OrderDepth {
    /// Create an empty order depth
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bid level. `volume` is a magnitude; zero volume removes the level.
    pub fn with_bid(mut self, price: Price, volume: Quantity) -> Self {
        self.set_bid(price, volume);
        self
    }

    /// Add an ask level. `volume` is a magnitude; zero volume removes the level.
    pub fn with_ask(mut self, price: Price, volume: Quantity) -> Self {
        self.set_ask(price, volume);
        self
    }

    pub fn set_bid(&mut self, price: Price, volume: Quantity) {
        if volume == 0 {
            self.buy_orders.remove(&price);
        } else {
            self.buy_orders.insert(price, volume.abs());
        }
    }

    pub fn set_ask(&mut self, price: Price, volume: Quantity) {
        if volume == 0 {
            self.sell_orders.remove(&price);
        } else {
            self.sell_orders.insert(price, -volume.abs());
        }
    }

    // === Price Queries ===

    /// Best bid price and volume
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.buy_orders.iter().next_back().map(|(p, q)| (*p, q.abs()))
    }

    /// Best ask price and volume (volume as a positive magnitude)
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.sell_orders.iter().next().map(|(p, q)| (*p, q.abs()))
    }

    /// Mid price (average of best bid and ask)
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(midpoint(bid, ask)),
            _ => None,
        }
    }

    /// Spread (ask - bid)
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask - bid),
            _ => None,
        }
    }

    // === Level Queries ===

    /// Bid levels, highest price first
    pub fn bids(&self) -> impl Iterator<Item = (Price, Quantity)> + '_ {
        self.buy_orders.iter().rev().map(|(p, q)| (*p, q.abs()))
    }

    /// Ask levels, lowest price first (volume as a positive magnitude)
    pub fn asks(&self) -> impl Iterator<Item = (Price, Quantity)> + '_ {
        self.sell_orders.iter().map(|(p, q)| (*p, q.abs()))
    }

    /// Resting bid volume at a price (0 if no level)
    pub fn bid_volume_at(&self, price: Price) -> Quantity {
        self.buy_orders.get(&price).map(|q| q.abs()).unwrap_or(0)
    }

    /// Resting ask volume at a price as a positive magnitude (0 if no level)
    pub fn ask_volume_at(&self, price: Price) -> Quantity {
        self.sell_orders.get(&price).map(|q| q.abs()).unwrap_or(0)
    }

    pub fn total_bid_volume(&self) -> Quantity {
        self.buy_orders.values().map(|q| q.abs()).sum()
    }

    pub fn total_ask_volume(&self) -> Quantity {
        self.sell_orders.values().map(|q| q.abs()).sum()
    }

    /// Check if both sides are empty
    pub fn is_empty(&self) -> bool {
        self.buy_orders.is_empty() && self.sell_orders.is_empty()
    }

    /// Check if book has both sides
    pub fn is_two_sided(&self) -> bool {
        !self.buy_orders.is_empty() && !self.sell_orders.is_empty()
    }

    // === Filtered Views ===

    /// Highest bid whose volume is at least `min_volume`
    pub fn filtered_best_bid(&self, min_volume: Quantity) -> Option<Price> {
        self.bids().find(|(_, q)| *q >= min_volume).map(|(p, _)| p)
    }

    /// Lowest ask whose volume is at least `min_volume`
    pub fn filtered_best_ask(&self, min_volume: Quantity) -> Option<Price> {
        self.asks().find(|(_, q)| *q >= min_volume).map(|(p, _)| p)
    }

    /// Bid level carrying the most volume (highest price wins ties)
    pub fn popular_bid(&self) -> Option<Price> {
        most_volume(self.bids())
    }

    /// Ask level carrying the most volume (lowest price wins ties)
    pub fn popular_ask(&self) -> Option<Price> {
        most_volume(self.asks())
    }

    /// Midpoint of the most popular bid and ask levels
    pub fn popular_mid(&self) -> Option<Decimal> {
        Some(midpoint(self.popular_bid()?, self.popular_ask()?))
    }

    /// Touch price weighted by the opposite side's volume
    ///
    /// `(bid * ask_vol + ask * bid_vol) / (bid_vol + ask_vol)`, falling back
    /// to the midpoint when there is no volume at the touch.
    pub fn volume_weighted_touch(&self) -> Option<Decimal> {
        let (bid, bid_vol) = self.best_bid()?;
        let (ask, ask_vol) = self.best_ask()?;
        let total = bid_vol + ask_vol;
        if total == 0 {
            return Some(midpoint(bid, ask));
        }
        let weighted = Decimal::from(bid) * Decimal::from(ask_vol)
            + Decimal::from(ask) * Decimal::from(bid_vol);
        Some(weighted / Decimal::from(total))
    }
}

/// Exact midpoint of two prices
pub fn midpoint(bid: Price, ask: Price) -> Decimal {
    (Decimal::from(bid) + Decimal::from(ask)) / Decimal::TWO
}

fn most_volume(levels: impl Iterator<Item = (Price, Quantity)>) -> Option<Price> {
    let mut best: Option<(Price, Quantity)> = None;
    for (price, volume) in levels {
        match best {
            Some((_, v)) if volume <= v => {}
            _ => best = Some((price, volume)),
        }
    }
    best.map(|(p, _)| p)
}
