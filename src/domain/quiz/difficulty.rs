//! Question difficulty levels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// Difficulty of a question, or `Mixed` when requesting any difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Mixed,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Mixed => "mixed",
        }
    }

    /// Whether a question of difficulty `other` satisfies a request for `self`
    pub fn accepts(&self, other: Difficulty) -> bool {
        matches!(self, Self::Mixed) || *self == other
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for strings that are not a difficulty level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown difficulty '{0}'. Valid values: easy, medium, hard, mixed")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "mixed" => Ok(Self::Mixed),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}

/// `validator` rule for difficulty strings
pub(crate) fn validate_difficulty(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Difficulty>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_enum"))
}
