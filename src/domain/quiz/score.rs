//! Score bands shared by quiz scores and topic correctness rates

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of the mastered band, as a 0-1 rate
pub const MASTERED_RATE: f64 = 0.70;
/// Lower bound (inclusive) of the medium band, as a 0-1 rate
pub const MEDIUM_RATE: f64 = 0.50;

/// Classification of a score on the 0-100 scale
///
/// - `Failed`: 0-49
/// - `Medium`: 50-69
/// - `Mastered`: 70-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Failed,
    Medium,
    Mastered,
}

impl ScoreBand {
    /// Classifies a correctness rate in [0, 1]
    ///
    /// Rates are compared directly against the 0-1 thresholds so that a rate
    /// of exactly 0.70 lands in `Mastered`.
    pub fn from_rate(rate: f64) -> Self {
        if rate >= MASTERED_RATE {
            Self::Mastered
        } else if rate >= MEDIUM_RATE {
            Self::Medium
        } else {
            Self::Failed
        }
    }

    /// Classifies a score on the 0-100 scale
    pub fn from_score(score: f64) -> Self {
        Self::from_rate(score / 100.0)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failed => "failed",
            Self::Medium => "medium",
            Self::Mastered => "mastered",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_boundaries() {
        assert_eq!(ScoreBand::from_rate(0.70), ScoreBand::Mastered);
        assert_eq!(ScoreBand::from_rate(0.50), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_rate(0.499999), ScoreBand::Failed);
        assert_eq!(ScoreBand::from_rate(0.699999), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_rate(1.0), ScoreBand::Mastered);
        assert_eq!(ScoreBand::from_rate(0.0), ScoreBand::Failed);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(49.0), ScoreBand::Failed);
        assert_eq!(ScoreBand::from_score(50.0), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(69.0), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(70.0), ScoreBand::Mastered);
        assert_eq!(ScoreBand::from_score(100.0), ScoreBand::Mastered);
    }
}
