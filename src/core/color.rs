//! Roll Colors
//!
//! Maps a roll value onto its color band and carries the `RollResult`
//! record whose color is always the one its roll maps to.

use serde::{Deserialize, Serialize};

use crate::config::RollConfig;
use crate::error::{Result, RollError};

/// Classification of a roll value.
///
/// Ordered so `BTreeMap<RollColor, _>` iterates deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollColor {
    /// Low band.
    Black,
    /// Middle band.
    Yellow,
    /// Reserved top band.
    Dice,
}

impl RollColor {
    /// Every color, in band order.
    pub const ALL: [RollColor; 3] = [RollColor::Black, RollColor::Yellow, RollColor::Dice];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            RollColor::Black => "black",
            RollColor::Yellow => "yellow",
            RollColor::Dice => "dice",
        }
    }
}

impl std::fmt::Display for RollColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a roll onto its color band.
///
/// Fails only when `roll` is outside `[0, roll_range)`.
#[inline]
pub fn map_to_color(roll: u32, config: &RollConfig) -> Result<RollColor> {
    if roll >= config.roll_range {
        return Err(RollError::RollOutOfRange {
            roll,
            roll_range: config.roll_range,
        });
    }

    let color = if roll < config.colors.black_end {
        RollColor::Black
    } else if roll < config.colors.yellow_end {
        RollColor::Yellow
    } else {
        RollColor::Dice
    };
    Ok(color)
}

/// A single game outcome.
///
/// Constructors reject a color that does not match the roll. Records
/// deserialized from storage are not checked; readers recompute the color
/// from the roll (see [`RollResult::relabel`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    roll: u32,
    color: RollColor,
}

impl RollResult {
    /// Build a result, rejecting a mismatched color.
    pub fn new(roll: u32, color: RollColor, config: &RollConfig) -> Result<Self> {
        let actual = map_to_color(roll, config)?;
        if actual != color {
            return Err(RollError::ColorMismatch {
                roll,
                claimed: color,
                actual,
            });
        }
        Ok(Self { roll, color })
    }

    /// Build a result with the color derived from the roll.
    pub fn from_roll(roll: u32, config: &RollConfig) -> Result<Self> {
        let color = map_to_color(roll, config)?;
        Ok(Self { roll, color })
    }

    /// Roll value.
    pub fn roll(&self) -> u32 {
        self.roll
    }

    /// Stored color label.
    pub fn color(&self) -> RollColor {
        self.color
    }

    /// Check the stored label against the roll.
    pub fn validate(&self, config: &RollConfig) -> Result<()> {
        Self::new(self.roll, self.color, config).map(|_| ())
    }

    /// Color recomputed from the roll, ignoring the stored label.
    pub fn relabel(&self, config: &RollConfig) -> Result<RollColor> {
        map_to_color(self.roll, config)
    }
}
