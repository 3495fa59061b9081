//! Difficulty tiers.
//!
//! Both formulas bucket a continuous signal into six study tiers. The
//! breakpoints are calibration constants: downstream tier tags depend on
//! them, so they must not drift.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty bucket in `1..=6`; 1 is the most basic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const MIN: Tier = Tier(1);
    pub const MAX: Tier = Tier(6);

    /// Clamp any integer into the tier range.
    pub fn clamped(value: i64) -> Self {
        Tier(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Tier(value))
        } else {
            Err(format!("tier out of range: {}", value))
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ranks per character tier.
pub const CHARACTER_TIER_WIDTH: u32 = 400;

/// `rank / 400 + 1`, clamped. Unknown rank is the hardest tier.
pub fn character_tier(rank: Option<u32>) -> Tier {
    match rank {
        Some(rank) => Tier::clamped((rank / CHARACTER_TIER_WIDTH) as i64 + 1),
        None => Tier::MAX,
    }
}

/// `7 - ceil(log10(frequency) * 2)`, clamped. Zero, negative or non-finite
/// frequency is the hardest tier.
pub fn word_tier(frequency: f64) -> Tier {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Tier::MAX;
    }
    let raw = 7.0 - (frequency.log10() * 2.0).ceil();
    Tier::clamped(raw as i64)
}
