//! Archipelago Trader - Per-Tick Strategy Dispatcher
//!
//! Builds the configured strategies and runs them against each market
//! snapshot:
//!
//! - **Config**: position limits and per-symbol strategy selection (JSON)
//! - **Trader**: validates the config, owns the strategies, dispatches ticks
//!
//! ## Architecture
//!
//! ```text
//!   TraderConfig (JSON) ──► Trader::new ──► [Strategy per symbol]
//!
//!   TradingState ──► Trader::run ──┬──► MarketMaker      ──┐
//!                                  ├──► BasketArbitrage  ──┼──► TraderOutput
//!                                  ├──► ComponentSpread  ──┤
//!                                  └──► SegmentMomentum  ──┘
//!                                          │
//!                                          ▼
//!                                     EventSink
//! ```

pub mod config;
pub mod error;
pub mod trader;

// Re-export main types
pub use config::{TraderConfig, load_config, load_config_from_str, load_default_config};
pub use error::{ConfigError, Result};
pub use trader::{Trader, TraderOutput};
