use serde::Serialize;
use std::fmt;

/// Ordinal satisfaction band for a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SatisfactionLevel {
    #[serde(rename = "very low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl SatisfactionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SatisfactionLevel::VeryHigh => "very high",
            SatisfactionLevel::High => "high",
            SatisfactionLevel::Moderate => "moderate",
            SatisfactionLevel::Low => "low",
            SatisfactionLevel::VeryLow => "very low",
        }
    }
}

impl fmt::Display for SatisfactionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a final score to its band. Lower bounds are inclusive.
pub fn classify(score: u8) -> SatisfactionLevel {
    match score {
        85.. => SatisfactionLevel::VeryHigh,
        70..=84 => SatisfactionLevel::High,
        55..=69 => SatisfactionLevel::Moderate,
        40..=54 => SatisfactionLevel::Low,
        _ => SatisfactionLevel::VeryLow,
    }
}
