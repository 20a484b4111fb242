use crate::error::ObservatoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input tokens at which a call stops being `Simple`.
pub const MEDIUM_THRESHOLD: u64 = 200;
/// Input tokens at which a call becomes `Complex`.
pub const COMPLEX_THRESHOLD: u64 = 1000;

/// Coarse task difficulty inferred from input size
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Simple, Complexity::Medium, Complexity::Complex];

    /// Minimum quality score a model needs to handle this bucket.
    pub fn min_quality(&self) -> f64 {
        match self {
            Complexity::Simple => 7.0,
            Complexity::Medium => 8.5,
            Complexity::Complex => 9.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = ObservatoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "medium" => Ok(Complexity::Medium),
            "complex" => Ok(Complexity::Complex),
            _ => Err(ObservatoryError::UnknownComplexityBucket(s.to_string())),
        }
    }
}

/// Estimate task complexity based on input token count
pub fn classify(input_tokens: u64) -> Complexity {
    if input_tokens < MEDIUM_THRESHOLD {
        Complexity::Simple
    } else if input_tokens < COMPLEX_THRESHOLD {
        Complexity::Medium
    } else {
        Complexity::Complex
    }
}
