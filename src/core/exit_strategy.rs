use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, Result};
use crate::models::TP_SLOTS;

/// Allowed deviation of a strategy's fraction sum from 1.0.
pub const FRACTION_TOLERANCE: f64 = 1e-9;

/// Fractions of the position closed at TP1..TP6.
///
/// Only constructed through validating constructors, so every value sums to
/// 1.0 within [`FRACTION_TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; TP_SLOTS]", into = "[f64; TP_SLOTS]")]
pub struct ExitStrategy {
    fractions: [f64; TP_SLOTS],
}

/// 50/20/10/10/10 with nothing left for TP6. Default for evaluation and the
/// optimizer's comparison baseline.
pub const BASELINE: ExitStrategy = ExitStrategy {
    fractions: [0.50, 0.20, 0.10, 0.10, 0.10, 0.0],
};

/// Baseline variant that splits the last 10% evenly between TP5 and TP6.
pub const TP6_SPLIT: ExitStrategy = ExitStrategy {
    fractions: [0.50, 0.20, 0.10, 0.10, 0.05, 0.05],
};

impl ExitStrategy {
    pub fn new(fractions: [f64; TP_SLOTS]) -> Result<Self> {
        for (i, &f) in fractions.iter().enumerate() {
            if !f.is_finite() || !(0.0..=1.0).contains(&f) {
                return Err(EngineError::InvalidStrategy {
                    reason: format!("TP{} fraction {} is outside [0, 1]", i + 1, f),
                });
            }
        }
        let sum: f64 = fractions.iter().sum();
        if (sum - 1.0).abs() > FRACTION_TOLERANCE {
            return Err(EngineError::InvalidStrategy {
                reason: format!("fractions sum to {:.12}, expected 1.0", sum),
            });
        }
        Ok(Self { fractions })
    }

    /// Builds a strategy from whole percentages that must add up to exactly 100.
    pub fn from_percentages(percentages: [u32; TP_SLOTS]) -> Result<Self> {
        let total: u32 = percentages.iter().sum();
        if total != 100 {
            return Err(EngineError::InvalidStrategy {
                reason: format!("percentages sum to {}, expected 100", total),
            });
        }
        Ok(Self {
            fractions: percentages.map(|p| p as f64 / 100.0),
        })
    }

    /// For percentages produced by the composition generator, which always
    /// sum to 100.
    pub(crate) fn from_generated(percentages: [u32; TP_SLOTS]) -> Self {
        debug_assert_eq!(percentages.iter().sum::<u32>(), 100);
        Self {
            fractions: percentages.map(|p| p as f64 / 100.0),
        }
    }

    pub fn fractions(&self) -> &[f64; TP_SLOTS] {
        &self.fractions
    }

    /// Fraction closed at TP `level` (1-based); 0 outside 1..=6.
    pub fn fraction(&self, level: u8) -> f64 {
        if level == 0 {
            return 0.0;
        }
        self.fractions.get(level as usize - 1).copied().unwrap_or(0.0)
    }

    pub fn percentages(&self) -> [u32; TP_SLOTS] {
        self.fractions.map(|f| (f * 100.0).round() as u32)
    }

    /// Compact form such as `50-20-10-10-10`; TP6 is appended only when used.
    pub fn label(&self) -> String {
        let p = self.percentages();
        let mut parts: Vec<String> = p[..5].iter().map(|v| v.to_string()).collect();
        if p[5] > 0 {
            parts.push(p[5].to_string());
        }
        parts.join("-")
    }
}

impl Default for ExitStrategy {
    fn default() -> Self {
        BASELINE
    }
}

impl fmt::Display for ExitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<[f64; TP_SLOTS]> for ExitStrategy {
    type Error = EngineError;

    fn try_from(fractions: [f64; TP_SLOTS]) -> Result<Self> {
        Self::new(fractions)
    }
}

impl From<ExitStrategy> for [f64; TP_SLOTS] {
    fn from(s: ExitStrategy) -> Self {
        s.fractions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_strategies_are_valid() {
        assert!(ExitStrategy::new(*BASELINE.fractions()).is_ok());
        assert!(ExitStrategy::new(*TP6_SPLIT.fractions()).is_ok());
        assert_eq!(ExitStrategy::default(), BASELINE);
    }

    #[test]
    fn rejects_bad_sums() {
        let err = ExitStrategy::new([0.5, 0.2, 0.1, 0.1, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidStrategy { .. }));
        assert!(ExitStrategy::from_percentages([50, 50, 10, 0, 0, 0]).is_err());
    }

    #[test]
    fn rejects_out_of_range_fractions() {
        assert!(ExitStrategy::new([1.5, -0.5, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(ExitStrategy::new([f64::NAN, 1.0, 0.0, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(BASELINE.label(), "50-20-10-10-10");
        assert_eq!(TP6_SPLIT.label(), "50-20-10-10-5-5");
        let s = ExitStrategy::from_percentages([0, 0, 100, 0, 0, 0]).unwrap();
        assert_eq!(s.to_string(), "0-0-100-0-0");
        assert_eq!(s.fraction(3), 1.0);
        assert_eq!(s.fraction(0), 0.0);
        assert_eq!(s.fraction(7), 0.0);
    }

    #[test]
    fn deserialization_validates() {
        let ok: ExitStrategy = serde_json::from_str("[0.5,0.2,0.1,0.1,0.1,0.0]").unwrap();
        assert_eq!(ok, BASELINE);
        assert!(serde_json::from_str::<ExitStrategy>("[0.5,0.5,0.5,0,0,0]").is_err());
    }
}
