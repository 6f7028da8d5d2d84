//! Archipelago Core Domain
//!
//! Pure domain types for the Archipelago trading engine.
//! This crate contains no I/O and is 100% unit testable.

pub mod book;
pub mod entities;
pub mod stats;
pub mod values;

// Re-export commonly used types at crate root
pub use book::{OrderDepth, TradingState, midpoint};
pub use entities::{
    Listing, Order, PositionLimits, Side, Trade, buy_capacity, is_pinned, sell_capacity,
};
pub use stats::RollingWindow;
pub use values::{Price, Quantity, Symbol, Timestamp};
