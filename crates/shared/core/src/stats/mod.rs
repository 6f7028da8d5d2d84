//! Decimal statistics for fair value estimation
//!
//! Small closed-form helpers over fixed-size windows:
//!
//! - Mean and standard deviation (sample and population)
//! - Log returns
//! - Least-squares linear forecast

mod rolling;

pub use rolling::RollingWindow;

use rust_decimal::{Decimal, MathematicalOps};

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len()))
}

fn sum_sq_diff(values: &[Decimal], mean: Decimal) -> Decimal {
    values
        .iter()
        .map(|x| {
            let diff = *x - mean;
            diff * diff
        })
        .sum()
}

/// Sample standard deviation (n - 1 denominator), `None` below two values
pub fn sample_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = sum_sq_diff(values, m) / Decimal::from(values.len() - 1);
    variance.sqrt()
}

/// Population standard deviation (n denominator), `None` for an empty slice
pub fn population_std_dev(values: &[Decimal]) -> Option<Decimal> {
    let m = mean(values)?;
    let variance = sum_sq_diff(values, m) / Decimal::from(values.len());
    variance.sqrt()
}

/// Log returns `ln(p[i] / p[i-1])`, `None` if any price is non-positive
pub fn log_returns(prices: &[Decimal]) -> Option<Vec<Decimal>> {
    prices
        .windows(2)
        .map(|pair| {
            if pair[0] <= Decimal::ZERO || pair[1] <= Decimal::ZERO {
                return None;
            }
            (pair[1] / pair[0]).checked_ln()
        })
        .collect()
}

/// Fit `y = slope * x + intercept` by least squares and evaluate at `next_x`
///
/// Falls back to the last observed `y` with fewer than two points or when
/// all `x` are equal, and to zero when there are no points at all.
pub fn linear_forecast(xs: &[Decimal], ys: &[Decimal], next_x: Decimal) -> Decimal {
    let n = xs.len().min(ys.len());
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let Some(last) = ys.last().copied() else {
        return Decimal::ZERO;
    };
    if n < 2 {
        return last;
    }

    let (Some(x_mean), Some(y_mean)) = (mean(xs), mean(ys)) else {
        return last;
    };
    let sxx = sum_sq_diff(xs, x_mean);
    if sxx.is_zero() {
        return last;
    }
    let sxy: Decimal = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (*x - x_mean) * (*y - y_mean))
        .sum();

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    slope * next_x + intercept
}
