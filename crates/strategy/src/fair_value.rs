//! Fair value estimation
//!
//! A [`FairValuePolicy`] is chosen per symbol in configuration; the
//! [`FairValueEstimator`] owns whatever history the policy needs.

use archipelago_core::{Quantity, RollingWindow, midpoint, stats};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::basket::PriceReference;
use crate::error::Skip;
use crate::options::OptionPricing;
use crate::strategy::TickContext;

/// How a symbol's fair value is derived each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FairValuePolicy {
    /// Fixed value, independent of the book
    Constant { value: Decimal },
    /// Touch midpoint
    Midpoint,
    /// Midpoint of the best levels with at least `min_volume`, falling back
    /// to the touch on either side
    FilteredMidpoint { min_volume: Quantity },
    /// Midpoint of the highest-volume levels
    PopularMidpoint,
    /// Touch prices weighted by opposite volume
    VolumeWeightedTouch,
    /// Least-squares trend of recent mids, extrapolated one tick ahead
    LinearRegression {
        window: usize,
        #[serde(default)]
        require_full_window: bool,
    },
    /// Black-Scholes value off the underlying's recent mids
    BlackScholes(OptionPricing),
}

impl FairValuePolicy {
    /// Observations kept between ticks
    fn history_len(&self) -> usize {
        match self {
            FairValuePolicy::LinearRegression { window, .. } => *window,
            FairValuePolicy::BlackScholes(pricing) => pricing.window,
            _ => 1,
        }
    }
}

/// Stateful evaluator for a [`FairValuePolicy`]
#[derive(Debug, Clone)]
pub struct FairValueEstimator {
    policy: FairValuePolicy,
    /// `(tick, mid)` pairs; for options the mid is the underlying's
    history: RollingWindow<(Decimal, Decimal)>,
    ticks: u64,
}

impl FairValueEstimator {
    pub fn new(policy: FairValuePolicy) -> Self {
        let history = RollingWindow::new(policy.history_len());
        Self {
            policy,
            history,
            ticks: 0,
        }
    }

    pub fn policy(&self) -> &FairValuePolicy {
        &self.policy
    }

    /// Observations currently held
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Fair value for `ctx.symbol` this tick
    pub fn estimate(&mut self, ctx: &TickContext<'_>) -> Result<Decimal, Skip> {
        let missing_mid = || Skip::MissingMidPrice(ctx.symbol.to_string());

        match &self.policy {
            FairValuePolicy::Constant { value } => Ok(*value),

            FairValuePolicy::Midpoint => ctx.depth()?.mid_price().ok_or_else(missing_mid),

            FairValuePolicy::FilteredMidpoint { min_volume } => {
                let depth = ctx.depth()?;
                let (best_bid, _) = depth.best_bid().ok_or_else(missing_mid)?;
                let (best_ask, _) = depth.best_ask().ok_or_else(missing_mid)?;
                let bid = depth.filtered_best_bid(*min_volume).unwrap_or(best_bid);
                let ask = depth.filtered_best_ask(*min_volume).unwrap_or(best_ask);
                Ok(midpoint(bid, ask))
            }

            FairValuePolicy::PopularMidpoint => {
                ctx.depth()?.popular_mid().ok_or_else(missing_mid)
            }

            FairValuePolicy::VolumeWeightedTouch => ctx
                .depth()?
                .volume_weighted_touch()
                .ok_or_else(missing_mid),

            FairValuePolicy::LinearRegression {
                require_full_window,
                ..
            } => {
                let mid = ctx.depth()?.mid_price().ok_or_else(missing_mid)?;
                self.ticks += 1;
                let tick = Decimal::from(self.ticks);
                self.history.push((tick, mid));

                if *require_full_window && !self.history.is_full() {
                    return Ok(mid);
                }
                let (xs, ys): (Vec<Decimal>, Vec<Decimal>) = self.history.iter().copied().unzip();
                Ok(stats::linear_forecast(&xs, &ys, tick + Decimal::ONE))
            }

            FairValuePolicy::BlackScholes(pricing) => {
                let underlying = ctx.mid(&pricing.underlying, PriceReference::Touch)?;
                self.ticks += 1;
                self.history.push((Decimal::from(self.ticks), underlying));

                if !self.history.is_full() {
                    return Err(Skip::InsufficientHistory {
                        have: self.history.len(),
                        need: self.history.capacity(),
                    });
                }
                let strike = pricing
                    .strike_for(ctx.symbol)
                    .ok_or(Skip::Degenerate("no strike for option symbol"))?;
                let mids: Vec<Decimal> = self.history.iter().map(|(_, mid)| *mid).collect();
                pricing
                    .price_from_history(strike, &mids, ctx.timestamp())
                    .ok_or(Skip::Degenerate("empty underlying history"))
            }
        }
    }
}
