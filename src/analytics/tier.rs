use serde::{Deserialize, Serialize};
use std::fmt;

/// Performance band derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Below 50.
    #[serde(rename = "none")]
    Unranked,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    /// Outside [0, 100], or not a finite number.
    Invalid,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Unranked => "none",
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
            Tier::Diamond => "diamond",
            Tier::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score bands checked in order: (lower, upper, upper inclusive, tier).
///
/// | Range      | Tier     |
/// |------------|----------|
/// | [0, 50)    | none     |
/// | [50, 60)   | bronze   |
/// | [60, 70)   | silver   |
/// | [70, 80)   | gold     |
/// | [80, 90)   | platinum |
/// | [90, 100]  | diamond  |
static TIER_BANDS: &[(f64, f64, bool, Tier)] = &[
    (0.0, 50.0, false, Tier::Unranked),
    (50.0, 60.0, false, Tier::Bronze),
    (60.0, 70.0, false, Tier::Silver),
    (70.0, 80.0, false, Tier::Gold),
    (80.0, 90.0, false, Tier::Platinum),
    (90.0, 100.0, true, Tier::Diamond),
];

/// Maps a score onto its [`Tier`]. Total over every `f64`.
pub fn classify(score: f64) -> Tier {
    TIER_BANDS
        .iter()
        .find(|(lower, upper, inclusive, _)| {
            score >= *lower && (score < *upper || (*inclusive && score == *upper))
        })
        .map(|(.., tier)| *tier)
        .unwrap_or(Tier::Invalid)
}
