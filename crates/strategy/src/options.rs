//! Black-Scholes pricing for voucher-style options
//!
//! The underlying's recent mids drive both the spot estimate and the
//! volatility; strike comes from the symbol suffix (`VOUCHER_10250`).

use archipelago_core::{Symbol, Timestamp, stats};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    #[default]
    Call,
    Put,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "C"),
            OptionType::Put => write!(f, "P"),
        }
    }
}

/// Parameters for pricing an option off its underlying's mid history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionPricing {
    pub underlying: Symbol,
    #[serde(default)]
    pub option_type: OptionType,
    /// Overrides the strike parsed from the symbol
    #[serde(default)]
    pub strike: Option<Decimal>,
    /// Underlying mids required before pricing
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_volatility_floor")]
    pub volatility_floor: Decimal,
    #[serde(default)]
    pub risk_free_rate: Decimal,
    /// Day on which the option expires
    pub expiry_day: Decimal,
    #[serde(default = "default_ticks_per_day")]
    pub ticks_per_day: Timestamp,
    #[serde(default = "default_days_per_year")]
    pub days_per_year: Decimal,
}

fn default_window() -> usize {
    30
}

fn default_volatility_floor() -> Decimal {
    dec!(0.01)
}

fn default_ticks_per_day() -> Timestamp {
    1_000_000
}

fn default_days_per_year() -> Decimal {
    dec!(365)
}

impl OptionPricing {
    pub fn new(underlying: impl Into<Symbol>, expiry_day: Decimal) -> Self {
        Self {
            underlying: underlying.into(),
            option_type: OptionType::Call,
            strike: None,
            window: default_window(),
            volatility_floor: default_volatility_floor(),
            risk_free_rate: Decimal::ZERO,
            expiry_day,
            ticks_per_day: default_ticks_per_day(),
            days_per_year: default_days_per_year(),
        }
    }

    /// Strike for `symbol`: explicit override, else the trailing `_` segment
    pub fn strike_for(&self, symbol: &str) -> Option<Decimal> {
        self.strike.or_else(|| parse_strike(symbol))
    }

    /// Years remaining until expiry at `timestamp` (may be zero or negative)
    pub fn time_to_expiry(&self, timestamp: Timestamp) -> Decimal {
        if self.ticks_per_day <= 0 || self.days_per_year.is_zero() {
            return Decimal::ZERO;
        }
        let elapsed_days = Decimal::from(timestamp) / Decimal::from(self.ticks_per_day);
        (self.expiry_day - elapsed_days) / self.days_per_year
    }

    /// Price from a window of underlying mids, oldest first
    pub fn price_from_history(
        &self,
        strike: Decimal,
        underlying_mids: &[Decimal],
        timestamp: Timestamp,
    ) -> Option<Decimal> {
        let spot = stats::mean(underlying_mids)?;
        let sigma = estimate_volatility(underlying_mids, self.volatility_floor);
        let t = self.time_to_expiry(timestamp);
        Some(black_scholes(
            self.option_type,
            spot,
            strike,
            t,
            self.risk_free_rate,
            sigma,
        ))
    }
}

/// Parse the numeric suffix after the last `_`
pub fn parse_strike(symbol: &str) -> Option<Decimal> {
    let (_, suffix) = symbol.rsplit_once('_')?;
    suffix.parse::<i64>().ok().map(Decimal::from)
}

/// Population std dev of log returns, never below `floor`
pub fn estimate_volatility(prices: &[Decimal], floor: Decimal) -> Decimal {
    stats::log_returns(prices)
        .filter(|r| !r.is_empty())
        .and_then(|r| stats::population_std_dev(&r))
        .map_or(floor, |sigma| sigma.max(floor))
}

/// Standard normal CDF, saturated outside `[-6, 6]`
pub fn norm_cdf(x: Decimal) -> Decimal {
    if x > dec!(6) {
        Decimal::ONE
    } else if x < dec!(-6) {
        Decimal::ZERO
    } else {
        x.norm_cdf()
    }
}

/// Intrinsic value at expiry
pub fn intrinsic_value(option_type: OptionType, spot: Decimal, strike: Decimal) -> Decimal {
    match option_type {
        OptionType::Call => (spot - strike).max(Decimal::ZERO),
        OptionType::Put => (strike - spot).max(Decimal::ZERO),
    }
}

/// Black-Scholes price
///
/// Degenerates to intrinsic value when time or volatility is non-positive,
/// or when the inputs make `ln(S/K)` undefined.
pub fn black_scholes(
    option_type: OptionType,
    spot: Decimal,
    strike: Decimal,
    t: Decimal,
    r: Decimal,
    sigma: Decimal,
) -> Decimal {
    let intrinsic = intrinsic_value(option_type, spot, strike);
    if t <= Decimal::ZERO
        || sigma <= Decimal::ZERO
        || spot <= Decimal::ZERO
        || strike <= Decimal::ZERO
    {
        return intrinsic;
    }
    let Some(sqrt_t) = t.sqrt() else {
        return intrinsic;
    };
    let vol_sqrt_t = sigma * sqrt_t;
    if vol_sqrt_t.is_zero() {
        return intrinsic;
    }
    let Some(log_moneyness) = (spot / strike).checked_ln() else {
        return intrinsic;
    };

    let d1 = (log_moneyness + (r + sigma * sigma / Decimal::TWO) * t) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    let discounted_strike = strike * (-r * t).exp();

    let price = match option_type {
        OptionType::Call => spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionType::Put => discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1),
    };
    price.max(Decimal::ZERO)
}
