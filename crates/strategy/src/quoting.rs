//! Quoting policies
//!
//! Given a fair value and the book, turn it into orders:
//!
//! - [`TakeClearMake`]: cross mispriced levels, flatten at fair, then rest
//!   quotes just inside the edge band
//! - [`BookWalk`](crate::book_walk::BookWalk): walk levels up to a
//!   position-skewed limit, with optional liquidation
//! - Fixed spread around fair value
//! - Distance-scaled taking

use archipelago_core::{OrderDepth, Price, Quantity};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::book_walk::BookWalk;
use crate::events::Phase;
use crate::orders::{OrderBuilder, ceil_price, floor_price};

/// Quoting policy selected per symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuotingPolicy {
    TakeClearMake(TakeClearMake),
    BookWalk(BookWalk),
    /// Bid and ask a fixed distance either side of fair value
    FixedSpread { half_spread: Price },
    /// Take levels beyond `band_width`, sized by how far past the band they are
    ScaledTake {
        band_width: Decimal,
        max_order_size: Quantity,
    },
}

/// How fair value maps to clearing prices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearRounding {
    /// Clear only when fair value is a whole price
    #[default]
    Exact,
    /// Clear at `floor(fv)` when buying and `ceil(fv)` when selling
    FloorCeil,
}

impl ClearRounding {
    /// `(buy_price, sell_price)` for clearing, if any
    pub fn prices(self, fair_value: Decimal) -> Option<(Price, Price)> {
        match self {
            ClearRounding::Exact => {
                if !fair_value.fract().is_zero() {
                    return None;
                }
                let price = fair_value.to_i64()?;
                Some((price, price))
            }
            ClearRounding::FloorCeil => Some((floor_price(fair_value)?, ceil_price(fair_value)?)),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Three-phase market making
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeClearMake {
    /// Cross any level at least this far through fair value
    pub take_width: Decimal,
    /// Resting quotes stay at least this far from fair value
    pub edge_width: Decimal,
    #[serde(default)]
    pub clear_rounding: ClearRounding,
    /// Only take levels showing at most this much volume
    #[serde(default)]
    pub take_volume_cap: Option<Quantity>,
    #[serde(default = "default_true")]
    pub clear_enabled: bool,
}

impl TakeClearMake {
    pub fn new(take_width: Decimal, edge_width: Decimal) -> Self {
        Self {
            take_width,
            edge_width,
            clear_rounding: ClearRounding::Exact,
            take_volume_cap: None,
            clear_enabled: true,
        }
    }

    pub fn quote(&self, depth: &OrderDepth, fair_value: Decimal, orders: &mut OrderBuilder) {
        self.take(depth, fair_value, orders);
        if self.clear_enabled {
            self.clear(depth, fair_value, orders);
        }
        self.make(depth, fair_value, orders);
    }

    fn within_cap(&self, volume: Quantity) -> bool {
        self.take_volume_cap.is_none_or(|cap| volume <= cap)
    }

    /// Cross the touch when it is at least `take_width` through fair value
    pub fn take(&self, depth: &OrderDepth, fair_value: Decimal, orders: &mut OrderBuilder) {
        if let Some((ask, volume)) = depth.best_ask() {
            if Decimal::from(ask) <= fair_value - self.take_width && self.within_cap(volume) {
                orders.buy(ask, volume, Phase::Take);
            }
        }
        if let Some((bid, volume)) = depth.best_bid() {
            if Decimal::from(bid) >= fair_value + self.take_width && self.within_cap(volume) {
                orders.sell(bid, volume, Phase::Take);
            }
        }
    }

    /// Reduce projected inventory against resting volume at fair value
    pub fn clear(&self, depth: &OrderDepth, fair_value: Decimal, orders: &mut OrderBuilder) {
        let Some((fair_bid, fair_ask)) = self.clear_rounding.prices(fair_value) else {
            return;
        };
        let net = orders.net_position();
        if net > 0 {
            let volume = depth.bid_volume_at(fair_ask).min(net);
            orders.sell(fair_ask, volume, Phase::Clear);
        } else if net < 0 {
            let volume = depth.ask_volume_at(fair_bid).min(-net);
            orders.buy(fair_bid, volume, Phase::Clear);
        }
    }

    /// Rest the remaining capacity one tick inside the nearest level at or beyond the edge
    ///
    /// A level sitting within one tick of the edge still counts, so a touch
    /// exactly `edge_width` away is pennied. Quotes never cross: if both
    /// sides land on or through each other they are pulled to the ticks
    /// either side of fair value.
    pub fn make(&self, depth: &OrderDepth, fair_value: Decimal, orders: &mut OrderBuilder) {
        let upper = fair_value + self.edge_width;
        let lower = fair_value - self.edge_width;

        let ask = match depth.asks().find(|(p, _)| Decimal::from(*p) > upper - Decimal::ONE) {
            Some((level, _)) => Some(level - 1),
            None => ceil_price(upper),
        };
        let bid = match depth.bids().find(|(p, _)| Decimal::from(*p) < lower + Decimal::ONE) {
            Some((level, _)) => Some(level + 1),
            None => floor_price(lower),
        };
        let (bid, ask) = match (bid, ask) {
            (Some(b), Some(a)) if b >= a => (
                ceil_price(fair_value).map(|p| b.min(p - 1)),
                floor_price(fair_value).map(|p| a.max(p + 1)),
            ),
            quotes => quotes,
        };

        if let Some(bid) = bid {
            let volume = orders.buy_capacity();
            orders.buy(bid, volume, Phase::Make);
        }
        if let Some(ask) = ask {
            let volume = orders.sell_capacity();
            orders.sell(ask, volume, Phase::Make);
        }
    }
}

/// Quote both sides `half_spread` away from the floored fair value
pub fn fixed_spread(half_spread: Price, fair_value: Decimal, orders: &mut OrderBuilder) {
    let Some(base) = floor_price(fair_value) else {
        return;
    };
    let buy = orders.buy_capacity();
    orders.buy(base - half_spread, buy, Phase::Quote);
    let sell = orders.sell_capacity();
    orders.sell(base + half_spread, sell, Phase::Quote);
}

/// Take the touch when it sits beyond `band_width` from fair value
///
/// Size grows with `(distance / band_width)^1.5`, capped at twice
/// `max_order_size`.
pub fn scaled_take(
    band_width: Decimal,
    max_order_size: Quantity,
    depth: &OrderDepth,
    fair_value: Decimal,
    orders: &mut OrderBuilder,
) {
    if band_width <= Decimal::ZERO {
        return;
    }
    if let Some((ask, _)) = depth.best_ask() {
        let distance = fair_value - Decimal::from(ask);
        if distance > band_width {
            let volume = scaled_volume(distance / band_width, max_order_size);
            orders.buy(ask, volume, Phase::Take);
        }
    }
    if let Some((bid, _)) = depth.best_bid() {
        let distance = Decimal::from(bid) - fair_value;
        if distance > band_width {
            let volume = scaled_volume(distance / band_width, max_order_size);
            orders.sell(bid, volume, Phase::Take);
        }
    }
}

fn scaled_volume(ratio: Decimal, max_order_size: Quantity) -> Quantity {
    let Some(root) = ratio.sqrt() else {
        return 0;
    };
    let scale = (ratio * root).min(Decimal::TWO);
    (scale * Decimal::from(max_order_size))
        .trunc()
        .to_i64()
        .unwrap_or(0)
}
