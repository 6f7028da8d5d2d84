//! Single-Symbol Market Maker
//!
//! Combines a fair value policy with a quoting policy:
//! - Estimates fair value (constant, book-derived, regression or option model)
//! - Takes, clears and makes around it, or walks the book with inventory skew
//! - Clamps every order to the remaining position capacity
//! - Optionally liquidates after sustained pinning at the limit

use archipelago_core::{Order, Symbol};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidConfig, Skip};
use crate::events::{EventSink, StrategyEvent};
use crate::fair_value::{FairValueEstimator, FairValuePolicy};
use crate::liquidation::{LiquidationPolicy, LiquidationTracker};
use crate::orders::OrderBuilder;
use crate::quoting::{QuotingPolicy, TakeClearMake, fixed_spread, scaled_take};
use crate::strategy::{Strategy, StrategyState, TickContext};

/// Configuration for the market maker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMakerConfig {
    /// Symbol to trade
    pub symbol: Symbol,
    pub fair_value: FairValuePolicy,
    pub quoting: QuotingPolicy,
    /// Only meaningful with book-walk quoting
    #[serde(default)]
    pub liquidation: LiquidationPolicy,
}

impl Default for MarketMakerConfig {
    fn default() -> Self {
        Self {
            symbol: "RAINFOREST_RESIN".to_string(),
            fair_value: FairValuePolicy::Constant { value: dec!(10000) },
            quoting: QuotingPolicy::TakeClearMake(TakeClearMake::new(dec!(1), dec!(1))),
            liquidation: LiquidationPolicy::Disabled,
        }
    }
}

impl MarketMakerConfig {
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        let invalid = |reason: &str| -> Result<(), InvalidConfig> {
            Err(InvalidConfig::new(self.symbol.clone(), reason))
        };

        match &self.fair_value {
            FairValuePolicy::LinearRegression { window, .. } if *window < 2 => {
                return invalid("regression window must be at least 2");
            }
            FairValuePolicy::BlackScholes(pricing) => {
                if pricing.window < 2 {
                    return invalid("option pricing window must be at least 2");
                }
                if pricing.strike_for(&self.symbol).is_none() {
                    return invalid("no strike configured or parseable from symbol");
                }
                if pricing.ticks_per_day <= 0 {
                    return invalid("ticks_per_day must be positive");
                }
            }
            _ => {}
        }

        match &self.quoting {
            QuotingPolicy::TakeClearMake(params) => {
                if params.take_width.is_sign_negative() || params.edge_width.is_sign_negative() {
                    return invalid("take and edge widths must be non-negative");
                }
            }
            QuotingPolicy::FixedSpread { half_spread } if *half_spread < 0 => {
                return invalid("half spread must be non-negative");
            }
            QuotingPolicy::ScaledTake {
                band_width,
                max_order_size,
            } if *band_width <= Decimal::ZERO || *max_order_size <= 0 => {
                return invalid("scaled take needs a positive band and order size");
            }
            _ => {}
        }

        if self.liquidation.is_enabled() && !matches!(self.quoting, QuotingPolicy::BookWalk(_)) {
            return invalid("liquidation requires book-walk quoting");
        }
        if let LiquidationPolicy::PinnedWindow { window: 0, .. } = self.liquidation {
            return invalid("liquidation window must be positive");
        }
        Ok(())
    }
}

/// Fair-value market maker for one symbol
pub struct MarketMaker {
    config: MarketMakerConfig,
    estimator: FairValueEstimator,
    liquidation: LiquidationTracker,
    state: StrategyState,
}

impl MarketMaker {
    pub fn new(config: MarketMakerConfig) -> Self {
        let estimator = FairValueEstimator::new(config.fair_value.clone());
        let liquidation = LiquidationTracker::new(config.liquidation.clone());
        Self {
            config,
            estimator,
            liquidation,
            state: StrategyState::default(),
        }
    }

    pub fn config(&self) -> &MarketMakerConfig {
        &self.config
    }
}

impl Strategy for MarketMaker {
    fn name(&self) -> &str {
        "MarketMaker"
    }

    fn symbol(&self) -> &str {
        &self.config.symbol
    }

    fn on_tick(
        &mut self,
        ctx: &TickContext<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<Order>, Skip> {
        self.state.advance();

        let depth = ctx.depth()?;
        if depth.is_empty() {
            return Err(Skip::EmptyBook(ctx.symbol.to_string()));
        }

        let fair_value = self.estimator.estimate(ctx)?;
        sink.emit(StrategyEvent::FairValue {
            symbol: ctx.symbol.to_string(),
            value: fair_value,
        });

        let mut orders = OrderBuilder::for_context(ctx);
        match &self.config.quoting {
            QuotingPolicy::TakeClearMake(params) => params.quote(depth, fair_value, &mut orders),
            QuotingPolicy::BookWalk(params) => {
                params.quote(depth, fair_value, &mut self.liquidation, &mut orders, sink)
            }
            QuotingPolicy::FixedSpread { half_spread } => {
                fixed_spread(*half_spread, fair_value, &mut orders)
            }
            QuotingPolicy::ScaledTake {
                band_width,
                max_order_size,
            } => scaled_take(*band_width, *max_order_size, depth, fair_value, &mut orders),
        }

        debug!(
            "[{}] tick {} fv={} pos={} orders={}",
            ctx.symbol,
            self.state.tick,
            fair_value,
            orders.position(),
            orders.orders().count()
        );
        Ok(orders.finish(sink))
    }

    fn state(&self) -> &StrategyState {
        &self.state
    }
}
