//! Spread signals for relative-value strategies

use archipelago_core::RollingWindow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Skip;

/// Trading decision derived from a spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Spread below its band
    Buy,
    /// Spread above its band
    Sell,
    /// Spread has reverted, close any open position
    Flatten,
    Hold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpreadSignal {
    /// Trade whenever `|spread| > threshold`
    Threshold { threshold: Decimal },
    /// Trade on the z-score of the spread against its recent history
    ZScore {
        window: usize,
        entry_z: Decimal,
        exit_z: Decimal,
    },
}

impl SpreadSignal {
    /// Reason the parameters can never produce a sensible signal
    pub fn check(&self) -> Option<&'static str> {
        match self {
            SpreadSignal::Threshold { threshold } if threshold.is_sign_negative() => {
                Some("threshold must be non-negative")
            }
            SpreadSignal::ZScore { window, .. } if *window < 2 => {
                Some("z-score window must be at least 2")
            }
            SpreadSignal::ZScore { entry_z, exit_z, .. } if exit_z >= entry_z => {
                Some("exit z must be below entry z")
            }
            _ => None,
        }
    }
}

/// Signal plus the z-score that produced it, when there is one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub signal: Signal,
    pub z_score: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct SpreadTracker {
    policy: SpreadSignal,
    history: RollingWindow<Decimal>,
}

impl SpreadTracker {
    pub fn new(policy: SpreadSignal) -> Self {
        let window = match &policy {
            SpreadSignal::Threshold { .. } => 1,
            SpreadSignal::ZScore { window, .. } => *window,
        };
        Self {
            policy,
            history: RollingWindow::new(window),
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Record `spread` and decide
    pub fn evaluate(&mut self, spread: Decimal) -> Result<Reading, Skip> {
        match &self.policy {
            SpreadSignal::Threshold { threshold } => {
                let signal = if spread > *threshold {
                    Signal::Sell
                } else if spread < -*threshold {
                    Signal::Buy
                } else {
                    Signal::Hold
                };
                Ok(Reading {
                    signal,
                    z_score: None,
                })
            }
            SpreadSignal::ZScore {
                entry_z, exit_z, ..
            } => {
                self.history.push(spread);
                if !self.history.is_full() {
                    return Err(Skip::InsufficientHistory {
                        have: self.history.len(),
                        need: self.history.capacity(),
                    });
                }
                let z = self
                    .history
                    .z_score(spread)
                    .ok_or(Skip::Degenerate("zero spread deviation"))?;

                let signal = if z > *entry_z {
                    Signal::Sell
                } else if z < -*entry_z {
                    Signal::Buy
                } else if z.abs() < *exit_z {
                    Signal::Flatten
                } else {
                    Signal::Hold
                };
                Ok(Reading {
                    signal,
                    z_score: Some(z),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_threshold_signal() {
        let mut tracker = SpreadTracker::new(SpreadSignal::Threshold {
            threshold: dec!(50),
        });
        assert_eq!(tracker.evaluate(dec!(60)).unwrap().signal, Signal::Sell);
        assert_eq!(tracker.evaluate(dec!(-60)).unwrap().signal, Signal::Buy);
        assert_eq!(tracker.evaluate(dec!(50)).unwrap().signal, Signal::Hold);
    }

    #[test]
    fn test_check_parameters() {
        let bad = SpreadSignal::ZScore {
            window: 30,
            entry_z: dec!(1),
            exit_z: dec!(1.5),
        };
        assert_eq!(bad.check(), Some("exit z must be below entry z"));
        let good = SpreadSignal::ZScore {
            window: 30,
            entry_z: dec!(2),
            exit_z: dec!(0.5),
        };
        assert_eq!(good.check(), None);
    }

    #[test]
    fn test_zscore_waits_for_window() {
        let mut tracker = SpreadTracker::new(SpreadSignal::ZScore {
            window: 3,
            entry_z: dec!(1),
            exit_z: dec!(0.2),
        });
        assert_eq!(
            tracker.evaluate(dec!(1)),
            Err(Skip::InsufficientHistory { have: 1, need: 3 })
        );
        assert!(tracker.evaluate(dec!(2)).is_err());
        assert!(tracker.evaluate(dec!(3)).is_ok());
    }

    #[test]
    fn test_zscore_constant_history_is_degenerate() {
        let mut tracker = SpreadTracker::new(SpreadSignal::ZScore {
            window: 2,
            entry_z: dec!(1),
            exit_z: dec!(0.2),
        });
        let _ = tracker.evaluate(dec!(5));
        assert_eq!(
            tracker.evaluate(dec!(5)),
            Err(Skip::Degenerate("zero spread deviation"))
        );
    }

    #[test]
    fn test_zscore_entry_and_exit() {
        let policy = SpreadSignal::ZScore {
            window: 4,
            entry_z: dec!(1),
            exit_z: dec!(0.5),
        };

        // History [0, 0, 0, 10]: mean 2.5, sample std 5, z = 1.5
        let mut tracker = SpreadTracker::new(policy.clone());
        for spread in [dec!(0), dec!(0), dec!(0)] {
            let _ = tracker.evaluate(spread);
        }
        let reading = tracker.evaluate(dec!(10)).unwrap();
        assert_eq!(reading.signal, Signal::Sell);
        let z = reading.z_score.unwrap();
        assert!((z - dec!(1.5)).abs() < dec!(0.000001));

        // History [0, 2, -2, 0]: mean 0, z = 0
        let mut tracker = SpreadTracker::new(policy);
        for spread in [dec!(0), dec!(2), dec!(-2)] {
            let _ = tracker.evaluate(spread);
        }
        assert_eq!(tracker.evaluate(dec!(0)).unwrap().signal, Signal::Flatten);
    }
}
