//! Proficiency rating tokens.

use crate::error::ParseRatingError;
use serde::{Deserialize, Serialize};

/// A rating explicitly assigned to a skill.
///
/// The unrated state is not a variant: it is `None` wherever an
/// `Option<Rating>` appears, so "not yet assessed" can never be confused
/// with `Na` ("assessed as not applicable").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Na,
    Basic,
    Intermediate,
    Advanced,
}

impl Rating {
    /// All ratings in display order.
    pub const ALL: [Rating; 4] = [
        Rating::Na,
        Rating::Basic,
        Rating::Intermediate,
        Rating::Advanced,
    ];

    /// The three proficiency levels that carry rubric text.
    pub const LEVELS: [Rating; 3] = [Rating::Basic, Rating::Intermediate, Rating::Advanced];

    /// Persisted token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Na => "na",
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Human-facing label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Na => "N/A",
            Self::Basic => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl std::str::FromStr for Rating {
    type Err = ParseRatingError;

    /// Case-insensitive; accepts `n/a` for `na`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "na" | "n/a" => Ok(Self::Na),
            "basic" => Ok(Self::Basic),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(ParseRatingError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
