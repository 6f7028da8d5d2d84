//! Bounded rolling window

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Fixed-capacity ring buffer
///
/// Pushing into a full window evicts (and returns) the oldest value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingWindow<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a window holding at most `capacity` values (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a value, returning the evicted one when the window was full
    #[inline]
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.values.len() >= self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if window is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent value
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.values.back()
    }

    /// Oldest value
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.values.front()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<T: Clone> RollingWindow<T> {
    /// Copy of the values, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.values.iter().cloned().collect()
    }
}

impl RollingWindow<bool> {
    /// Number of `true` entries
    pub fn count_true(&self) -> usize {
        self.values.iter().filter(|v| **v).count()
    }

    /// Whether every entry is `true` (false for an empty window)
    pub fn all_true(&self) -> bool {
        !self.values.is_empty() && self.values.iter().all(|v| *v)
    }
}

impl RollingWindow<Decimal> {
    pub fn mean(&self) -> Option<Decimal> {
        super::mean(&self.to_vec())
    }

    pub fn sample_std_dev(&self) -> Option<Decimal> {
        super::sample_std_dev(&self.to_vec())
    }

    /// Z-score of `value` against the window, `None` if std dev is zero or undefined
    pub fn z_score(&self, value: Decimal) -> Option<Decimal> {
        let mean = self.mean()?;
        let std = self.sample_std_dev()?;
        if std.is_zero() {
            return None;
        }
        Some((value - mean) / std)
    }
}
