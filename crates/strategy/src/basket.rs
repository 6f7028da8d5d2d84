//! Basket Arbitrage
//!
//! A basket trades alongside its components, so its fair value is the
//! weighted sum of their mids. Two strategies read that relationship:
//! - [`BasketArbitrage`] trades the basket against its components
//! - [`ComponentSpread`] trades a component against the price implied by
//!   every basket that contains it

use archipelago_core::{Order, OrderDepth, Quantity, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{InvalidConfig, Skip};
use crate::events::{EventSink, Phase, StrategyEvent};
use crate::orders::OrderBuilder;
use crate::signal::{Reading, Signal, SpreadSignal, SpreadTracker};
use crate::strategy::{Strategy, StrategyState, TickContext};

/// Which midpoint basket strategies read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceReference {
    /// Best bid and best ask
    #[default]
    Touch,
    /// Highest-volume bid and ask levels
    Popular,
}

/// Basket composition: component symbol -> units per basket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketRecipe {
    pub basket: Symbol,
    pub components: BTreeMap<Symbol, Quantity>,
}

impl BasketRecipe {
    pub fn new<S: Into<Symbol>>(
        basket: impl Into<Symbol>,
        components: impl IntoIterator<Item = (S, Quantity)>,
    ) -> Self {
        Self {
            basket: basket.into(),
            components: components
                .into_iter()
                .map(|(s, w)| (s.into(), w))
                .collect(),
        }
    }

    pub fn weight(&self, symbol: &str) -> Option<Quantity> {
        self.components.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.components.contains_key(symbol)
    }

    /// Weighted sum of component mids
    pub fn component_value(
        &self,
        ctx: &TickContext<'_>,
        reference: PriceReference,
    ) -> Result<Decimal, Skip> {
        self.components.iter().try_fold(Decimal::ZERO, |acc, (symbol, weight)| {
            Ok::<_, Skip>(acc + Decimal::from(*weight) * ctx.mid(symbol, reference)?)
        })
    }

    /// Price of `leg` implied by the basket mid and the other components
    pub fn implied_price(
        &self,
        ctx: &TickContext<'_>,
        leg: &str,
        reference: PriceReference,
    ) -> Result<Decimal, Skip> {
        let weight = self
            .weight(leg)
            .filter(|w| *w != 0)
            .ok_or(Skip::Degenerate("leg has no weight in basket"))?;
        let basket_mid = ctx.mid(&self.basket, reference)?;
        let others = self
            .components
            .iter()
            .filter(|(symbol, _)| symbol.as_str() != leg)
            .try_fold(Decimal::ZERO, |acc, (symbol, w)| {
                Ok::<_, Skip>(acc + Decimal::from(*w) * ctx.mid(symbol, reference)?)
            })?;
        Ok((basket_mid - others) / Decimal::from(weight))
    }

    /// Component inventory offsetting `basket_quantity` baskets
    pub fn hedge_for(&self, basket_quantity: Quantity) -> BTreeMap<Symbol, Quantity> {
        self.components
            .iter()
            .map(|(symbol, weight)| (symbol.clone(), -basket_quantity * weight))
            .collect()
    }

    fn check(&self) -> Option<&'static str> {
        if self.components.is_empty() {
            Some("basket recipe has no components")
        } else if self.components.values().any(|w| *w <= 0) {
            Some("component weights must be positive")
        } else if self.contains(&self.basket) {
            Some("basket cannot contain itself")
        } else {
            None
        }
    }
}

/// Close an open position at the touch
fn flatten(depth: &OrderDepth, orders: &mut OrderBuilder) {
    let position = orders.position();
    if position > 0 {
        if let Some((bid, volume)) = depth.best_bid() {
            orders.sell(bid, volume.min(position), Phase::Flatten);
        }
    } else if position < 0 {
        if let Some((ask, volume)) = depth.best_ask() {
            orders.buy(ask, volume.min(-position), Phase::Flatten);
        }
    }
}

fn emit_reading(sink: &mut dyn EventSink, symbol: &str, spread: Decimal, reading: Reading) {
    sink.emit(StrategyEvent::SpreadSignal {
        symbol: symbol.to_string(),
        spread,
        z_score: reading.z_score,
        signal: reading.signal,
    });
}

// === Basket vs components ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketArbitrageConfig {
    #[serde(flatten)]
    pub recipe: BasketRecipe,
    pub signal: SpreadSignal,
    #[serde(default)]
    pub reference: PriceReference,
}

impl BasketArbitrageConfig {
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        match self.recipe.check().or_else(|| self.signal.check()) {
            Some(reason) => Err(InvalidConfig::new(self.recipe.basket.clone(), reason)),
            None => Ok(()),
        }
    }
}

/// Trades the basket when it drifts from the value of its components
pub struct BasketArbitrage {
    config: BasketArbitrageConfig,
    tracker: SpreadTracker,
    state: StrategyState,
}

impl BasketArbitrage {
    pub fn new(config: BasketArbitrageConfig) -> Self {
        let tracker = SpreadTracker::new(config.signal.clone());
        Self {
            config,
            tracker,
            state: StrategyState::default(),
        }
    }
}

impl Strategy for BasketArbitrage {
    fn name(&self) -> &str {
        "BasketArbitrage"
    }

    fn symbol(&self) -> &str {
        &self.config.recipe.basket
    }

    fn on_tick(
        &mut self,
        ctx: &TickContext<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<Order>, Skip> {
        self.state.advance();
        let reference = self.config.reference;

        let depth = ctx.depth()?;
        let basket_mid = ctx.mid(ctx.symbol, reference)?;
        let component_value = self.config.recipe.component_value(ctx, reference)?;
        let spread = basket_mid - component_value;

        let reading = self.tracker.evaluate(spread)?;
        emit_reading(sink, ctx.symbol, spread, reading);

        let mut orders = OrderBuilder::for_context(ctx);
        match reading.signal {
            Signal::Sell => {
                if let Some((bid, volume)) = depth.best_bid() {
                    orders.sell(bid, volume, Phase::Arbitrage);
                }
            }
            Signal::Buy => {
                if let Some((ask, volume)) = depth.best_ask() {
                    orders.buy(ask, volume, Phase::Arbitrage);
                }
            }
            Signal::Flatten => flatten(depth, &mut orders),
            Signal::Hold => {}
        }

        let traded = orders.buy_volume() - orders.sell_volume();
        if traded != 0 {
            self.state.hedge_targets = self.config.recipe.hedge_for(traded);
        }
        Ok(orders.finish(sink))
    }

    fn state(&self) -> &StrategyState {
        &self.state
    }
}

// === Component vs implied ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpreadConfig {
    /// Component this strategy trades
    pub symbol: Symbol,
    /// Every basket whose implied price feeds the spread
    pub baskets: Vec<BasketRecipe>,
    pub signal: SpreadSignal,
    /// Capacity kept unused on each side
    #[serde(default)]
    pub buffer: Quantity,
    /// Minimum product of per-basket deviations before trading
    #[serde(default)]
    pub agreement: Option<Decimal>,
    #[serde(default)]
    pub reference: PriceReference,
}

impl ComponentSpreadConfig {
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        let reason = if self.baskets.is_empty() {
            Some("at least one basket is required")
        } else if self.baskets.iter().any(|b| !b.contains(&self.symbol)) {
            Some("every basket must contain the traded component")
        } else if self.buffer < 0 {
            Some("buffer must be non-negative")
        } else {
            self.baskets
                .iter()
                .find_map(BasketRecipe::check)
                .or_else(|| self.signal.check())
        };
        match reason {
            Some(reason) => Err(InvalidConfig::new(self.symbol.clone(), reason)),
            None => Ok(()),
        }
    }
}

/// Trades one component against the consensus of its baskets
pub struct ComponentSpread {
    config: ComponentSpreadConfig,
    tracker: SpreadTracker,
    state: StrategyState,
}

impl ComponentSpread {
    pub fn new(config: ComponentSpreadConfig) -> Self {
        let tracker = SpreadTracker::new(config.signal.clone());
        Self {
            config,
            tracker,
            state: StrategyState::default(),
        }
    }

    fn agrees(&self, implied: &[Decimal], leg_mid: Decimal) -> bool {
        match self.config.agreement {
            Some(min) if implied.len() >= 2 => {
                let product = implied
                    .iter()
                    .fold(Decimal::ONE, |acc, p| acc * (*p - leg_mid));
                product > min
            }
            _ => true,
        }
    }
}

impl Strategy for ComponentSpread {
    fn name(&self) -> &str {
        "ComponentSpread"
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
        let reference = self.config.reference;

        let depth = ctx.depth()?;
        let leg_mid = ctx.mid(ctx.symbol, reference)?;
        let implied = self
            .config
            .baskets
            .iter()
            .map(|recipe| recipe.implied_price(ctx, ctx.symbol, reference))
            .collect::<Result<Vec<_>, _>>()?;

        if !self.agrees(&implied, leg_mid) {
            return Ok(Vec::new());
        }

        let consensus = implied.iter().sum::<Decimal>() / Decimal::from(implied.len());
        let spread = leg_mid - consensus;
        let reading = self.tracker.evaluate(spread)?;
        emit_reading(sink, ctx.symbol, spread, reading);

        let buffer = self.config.buffer;
        let mut orders = OrderBuilder::for_context(ctx);
        match reading.signal {
            Signal::Sell => {
                if let Some((bid, volume)) = depth.best_bid() {
                    let room = orders.sell_capacity() - buffer;
                    if orders.sell(bid, volume.min(room), Phase::Arbitrage) > 0
                        && orders.position() == 0
                    {
                        self.state.entry_price = Some(Decimal::from(bid));
                    }
                }
            }
            Signal::Buy => {
                if let Some((ask, volume)) = depth.best_ask() {
                    let room = orders.buy_capacity() - buffer;
                    if orders.buy(ask, volume.min(room), Phase::Arbitrage) > 0
                        && orders.position() == 0
                    {
                        self.state.entry_price = Some(Decimal::from(ask));
                    }
                }
            }
            Signal::Flatten => {
                flatten(depth, &mut orders);
                if orders.net_position() == 0 {
                    self.state.entry_price = None;
                }
            }
            Signal::Hold => {}
        }
        Ok(orders.finish(sink))
    }

    fn state(&self) -> &StrategyState {
        &self.state
    }
}
