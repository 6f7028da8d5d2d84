use serde::{Deserialize, Serialize};

use super::Side;
use crate::values::{Price, Quantity, Symbol};

/// Order intent submitted to the matching engine
///
/// Created fresh every tick and never retained. Quantity is signed:
/// positive buys, negative sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Quantity,
}

impl Order {
    pub fn new(symbol: impl Into<Symbol>, price: Price, quantity: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
        }
    }

    /// Buy `quantity` (taken as a magnitude) at `price`
    pub fn buy(symbol: impl Into<Symbol>, price: Price, quantity: Quantity) -> Self {
        Self::new(symbol, price, quantity.abs())
    }

    /// Sell `quantity` (taken as a magnitude) at `price`
    pub fn sell(symbol: impl Into<Symbol>, price: Price, quantity: Quantity) -> Self {
        Self::new(symbol, price, -quantity.abs())
    }

    /// Side implied by the quantity sign, `None` for a zero quantity
    pub fn side(&self) -> Option<Side> {
        match self.quantity {
            q if q > 0 => Some(Side::Buy),
            q if q < 0 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Unsigned size of the order
    pub fn size(&self) -> Quantity {
        self.quantity.abs()
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} x {}", self.symbol, self.quantity, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_sell_signs() {
        let buy = Order::buy("KELP", 2020, 5);
        let sell = Order::sell("KELP", 2022, 5);

        assert_eq!(buy.quantity, 5);
        assert_eq!(sell.quantity, -5);
        assert_eq!(buy.side(), Some(Side::Buy));
        assert_eq!(sell.side(), Some(Side::Sell));
        assert_eq!(sell.size(), 5);
    }

    #[test]
    fn test_sell_with_negative_input_stays_negative() {
        let sell = Order::sell("KELP", 2022, -3);
        assert_eq!(sell.quantity, -3);
    }

    #[test]
    fn test_zero_quantity_has_no_side() {
        assert_eq!(Order::new("KELP", 1, 0).side(), None);
    }
}
