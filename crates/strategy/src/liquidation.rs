//! Liquidation after sustained pinning at the position limit

use archipelago_core::{Price, Quantity, RollingWindow, is_pinned};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::events::LiquidationMode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiquidationPolicy {
    #[default]
    Disabled,
    /// Track whether `|position| == limit` over the last `window` ticks
    PinnedWindow {
        #[serde(default = "default_window")]
        window: usize,
        /// Fraction of pinned ticks that arms a soft liquidation
        #[serde(default = "default_soft_ratio")]
        soft_ratio: Decimal,
        /// Soft liquidation quotes this far through the true value
        #[serde(default = "default_soft_offset")]
        soft_offset: Price,
    },
}

fn default_window() -> usize {
    10
}

fn default_soft_ratio() -> Decimal {
    dec!(0.5)
}

fn default_soft_offset() -> Price {
    2
}

impl LiquidationPolicy {
    pub fn pinned_window() -> Self {
        LiquidationPolicy::PinnedWindow {
            window: default_window(),
            soft_ratio: default_soft_ratio(),
            soft_offset: default_soft_offset(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, LiquidationPolicy::Disabled)
    }
}

/// Which liquidations fire this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiquidationSignal {
    pub soft: bool,
    pub hard: bool,
}

impl LiquidationSignal {
    /// Most severe mode triggered
    pub fn mode(&self) -> Option<LiquidationMode> {
        if self.hard {
            Some(LiquidationMode::Hard)
        } else if self.soft {
            Some(LiquidationMode::Soft)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiquidationTracker {
    policy: LiquidationPolicy,
    pinned: RollingWindow<bool>,
}

impl LiquidationTracker {
    pub fn new(policy: LiquidationPolicy) -> Self {
        let window = match &policy {
            LiquidationPolicy::Disabled => 1,
            LiquidationPolicy::PinnedWindow { window, .. } => *window,
        };
        Self {
            policy,
            pinned: RollingWindow::new(window),
        }
    }

    pub fn soft_offset(&self) -> Price {
        match &self.policy {
            LiquidationPolicy::Disabled => 0,
            LiquidationPolicy::PinnedWindow { soft_offset, .. } => *soft_offset,
        }
    }

    /// Record this tick's position and decide what fires
    pub fn observe(&mut self, position: Quantity, limit: Quantity) -> LiquidationSignal {
        let LiquidationPolicy::PinnedWindow { soft_ratio, .. } = &self.policy else {
            return LiquidationSignal::default();
        };
        let pinned_now = is_pinned(limit, position);
        self.pinned.push(pinned_now);

        if !self.pinned.is_full() {
            return LiquidationSignal::default();
        }
        let pinned_share = Decimal::from(self.pinned.count_true());
        let required = *soft_ratio * Decimal::from(self.pinned.capacity());
        LiquidationSignal {
            soft: pinned_now && pinned_share >= required,
            hard: self.pinned.all_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_never_fires() {
        let mut tracker = LiquidationTracker::new(LiquidationPolicy::Disabled);
        for _ in 0..20 {
            assert_eq!(tracker.observe(50, 50), LiquidationSignal::default());
        }
    }

    #[test]
    fn test_hard_after_full_pinned_window() {
        let mut tracker = LiquidationTracker::new(LiquidationPolicy::pinned_window());
        for _ in 0..9 {
            assert_eq!(tracker.observe(-50, 50).mode(), None);
        }
        let signal = tracker.observe(-50, 50);
        assert!(signal.hard);
        assert!(signal.soft);
        assert_eq!(signal.mode(), Some(LiquidationMode::Hard));
    }

    #[test]
    fn test_short_and_long_pins_share_the_window() {
        let mut tracker = LiquidationTracker::new(LiquidationPolicy::pinned_window());
        for i in 0..9 {
            let position = if i % 2 == 0 { -50 } else { 50 };
            assert_eq!(tracker.observe(position, 50).mode(), None);
        }
        assert!(tracker.observe(-50, 50).hard);
    }

    #[test]
    fn test_short_off_limit_not_pinned() {
        let mut tracker = LiquidationTracker::new(LiquidationPolicy::pinned_window());
        for _ in 0..10 {
            assert_eq!(tracker.observe(-49, 50).mode(), None);
        }
    }

    #[test]
    fn test_soft_needs_latest_tick_pinned() {
        let mut tracker = LiquidationTracker::new(LiquidationPolicy::pinned_window());
        for i in 0..10 {
            let position = if i % 2 == 0 { 50 } else { 10 };
            tracker.observe(position, 50);
        }
        // Window is [50, 10, ...] ending unpinned: five of ten pinned
        assert_eq!(tracker.observe(50, 50).mode(), Some(LiquidationMode::Soft));
        assert_eq!(tracker.observe(10, 50).mode(), None);
    }

    #[test]
    fn test_policy_deserialize_defaults() {
        let policy: LiquidationPolicy =
            serde_json::from_str(r#"{"type": "pinned_window"}"#).unwrap();
        assert_eq!(policy, LiquidationPolicy::pinned_window());
        assert!(policy.is_enabled());
    }
}
