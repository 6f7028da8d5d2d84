use serde::{Deserialize, Serialize};

use crate::values::{Price, Quantity, Symbol, Timestamp};

/// Trade printed by the matching engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Quantity,
    /// Buyer identity (empty when anonymised)
    #[serde(default)]
    pub buyer: String,
    /// Seller identity (empty when anonymised)
    #[serde(default)]
    pub seller: String,
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl Trade {
    pub fn new(symbol: impl Into<Symbol>, price: Price, quantity: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
            buyer: String::new(),
            seller: String::new(),
            timestamp: 0,
        }
    }

    pub fn with_counterparties(mut self, buyer: impl Into<String>, seller: impl Into<String>) -> Self {
        self.buyer = buyer.into();
        self.seller = seller.into();
        self
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Notional value (price x quantity)
    pub fn notional(&self) -> i64 {
        self.price * self.quantity
    }
}

/// Listing of a tradeable product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: Symbol,
    pub product: String,
    pub denomination: String,
}

impl Listing {
    pub fn new(
        symbol: impl Into<Symbol>,
        product: impl Into<String>,
        denomination: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            product: product.into(),
            denomination: denomination.into(),
        }
    }
}
