//! Archipelago Strategy Engine
//!
//! Per-symbol trading strategies driven once per tick by a
//! [`TradingState`](archipelago_core::TradingState) snapshot:
//! - Fair value policies (constant, book-derived, regression, Black-Scholes)
//! - Take/clear/make and book-walk quoting with position-limit clamping
//! - Basket vs component spread trading
//! - Segment momentum
//!
//! ## Architecture
//!
//! ```text
//!  TradingState ──► TickContext (symbol, limit)
//!                        │
//!                        ▼
//!                  ┌──────────┐   FairValuePolicy ─► fair value
//!                  │ Strategy │   QuotingPolicy   ─► OrderBuilder (clamped)
//!                  └────┬─────┘   SpreadSignal    ─► Buy / Sell / Flatten
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!      Vec<Order>            EventSink (StrategyEvent)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use archipelago_strategy::{MarketMaker, MarketMakerConfig, Strategy, TickContext, LogSink};
//!
//! let mut strategy = MarketMaker::new(MarketMakerConfig::default());
//! let ctx = TickContext::new(&state, "RAINFOREST_RESIN", 50);
//! let orders = strategy.run(&ctx, &mut LogSink);
//! ```

pub mod basket;
pub mod book_walk;
pub mod config;
pub mod error;
pub mod events;
pub mod fair_value;
pub mod liquidation;
pub mod market_maker;
pub mod momentum;
pub mod options;
pub mod orders;
pub mod quoting;
pub mod signal;
pub mod strategy;

// Re-export main types
pub use basket::{
    BasketArbitrage, BasketArbitrageConfig, BasketRecipe, ComponentSpread, ComponentSpreadConfig,
    PriceReference,
};
pub use book_walk::BookWalk;
pub use config::StrategyConfig;
pub use error::{InvalidConfig, Skip, SkipKind};
pub use events::{EventSink, LiquidationMode, LogSink, Phase, RecordingSink, StrategyEvent};
pub use fair_value::{FairValueEstimator, FairValuePolicy};
pub use liquidation::{LiquidationPolicy, LiquidationTracker};
pub use market_maker::{MarketMaker, MarketMakerConfig};
pub use momentum::{SegmentMomentum, SegmentMomentumConfig};
pub use options::{OptionPricing, OptionType, black_scholes};
pub use orders::OrderBuilder;
pub use quoting::{ClearRounding, QuotingPolicy, TakeClearMake};
pub use signal::{Signal, SpreadSignal, SpreadTracker};
pub use strategy::{Strategy, StrategyState, TickContext};
