use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::values::{Quantity, Symbol};

/// Static per-symbol position limits
///
/// The exchange rejects anything that would push |position| past the limit;
/// strategies use the capacity helpers so they never emit such orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionLimits {
    limits: BTreeMap<Symbol, Quantity>,
}

impl PositionLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, symbol: impl Into<Symbol>, limit: Quantity) -> Self {
        self.insert(symbol, limit);
        self
    }

    pub fn insert(&mut self, symbol: impl Into<Symbol>, limit: Quantity) {
        self.limits.insert(symbol.into(), limit);
    }

    pub fn get(&self, symbol: &str) -> Option<Quantity> {
        self.limits.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.limits.contains_key(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Quantity)> {
        self.limits.iter()
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

impl<S: Into<Symbol>> FromIterator<(S, Quantity)> for PositionLimits {
    fn from_iter<I: IntoIterator<Item = (S, Quantity)>>(iter: I) -> Self {
        Self {
            limits: iter.into_iter().map(|(s, l)| (s.into(), l)).collect(),
        }
    }
}

/// Room left to buy before a fully filled order breaches the limit
pub fn buy_capacity(limit: Quantity, position: Quantity) -> Quantity {
    (limit - position).max(0)
}

/// Room left to sell before a fully filled order breaches the limit
pub fn sell_capacity(limit: Quantity, position: Quantity) -> Quantity {
    (limit + position).max(0)
}

/// Whether the position sits exactly on the limit (either side)
pub fn is_pinned(limit: Quantity, position: Quantity) -> bool {
    position.abs() == limit
}
