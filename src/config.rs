//! Configuration
//!
//! Game variant parameters (`RollConfig`) and predictor tuning
//! (`PredictorConfig`). Every type has a `Default` matching the reference
//! game and validates itself before use.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::color::RollColor;
use crate::error::{Result, RollError};

/// Default number of distinct roll outcomes (0..=9999).
pub const DEFAULT_ROLL_RANGE: u32 = 10_000;

/// Environment variable naming a JSON settings file.
pub const SETTINGS_ENV: &str = "ROLL_INTEL_CONFIG";

/// Tolerance used when checking that frequencies sum to one.
pub const FREQUENCY_EPSILON: f64 = 1e-9;

/// Contiguous color bands over `[0, roll_range)`.
///
/// `[0, black_end)` is black, `[black_end, yellow_end)` is yellow and
/// `[yellow_end, roll_range)` is dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTable {
    /// End (exclusive) of the black band.
    pub black_end: u32,
    /// End (exclusive) of the yellow band.
    pub yellow_end: u32,
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            black_end: 6_600,
            yellow_end: 9_900,
        }
    }
}

impl ColorTable {
    /// Width of the band a color occupies.
    pub fn band_width(&self, color: RollColor, roll_range: u32) -> u32 {
        match color {
            RollColor::Black => self.black_end,
            RollColor::Yellow => self.yellow_end.saturating_sub(self.black_end),
            RollColor::Dice => roll_range.saturating_sub(self.yellow_end),
        }
    }

    /// Half-open range a color occupies.
    pub fn band(&self, color: RollColor, roll_range: u32) -> std::ops::Range<u32> {
        match color {
            RollColor::Black => 0..self.black_end,
            RollColor::Yellow => self.black_end..self.yellow_end,
            RollColor::Dice => self.yellow_end..roll_range,
        }
    }
}

/// Layout of the HMAC message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum MessageFormat {
    /// `client_seed:nonce`
    #[default]
    ClientSeedNonce,
    /// `client_seed:nonce:round`
    ClientSeedNonceRound {
        /// Round index appended to the message.
        round: u64,
    },
}

/// Parameters of one game variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollConfig {
    /// Number of distinct roll outcomes.
    pub roll_range: u32,
    /// Color band boundaries.
    pub colors: ColorTable,
    /// HMAC message layout.
    pub message_format: MessageFormat,
    /// Bytes of the digest read as a big-endian integer.
    pub digest_prefix_bytes: usize,
    /// Reject server seeds that are not hex strings.
    pub require_hex_server_seed: bool,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            roll_range: DEFAULT_ROLL_RANGE,
            colors: ColorTable::default(),
            message_format: MessageFormat::default(),
            digest_prefix_bytes: 4,
            require_hex_server_seed: true,
        }
    }
}

impl RollConfig {
    /// Check ranges, bands and prefix width.
    pub fn validate(&self) -> Result<()> {
        if self.roll_range < 3 {
            return Err(RollError::InvalidRollRange(self.roll_range));
        }
        let ColorTable { black_end, yellow_end } = self.colors;
        if black_end == 0 || black_end >= yellow_end || yellow_end >= self.roll_range {
            return Err(RollError::InvalidColorBands {
                black_end,
                yellow_end,
                roll_range: self.roll_range,
            });
        }
        if !(1..=8).contains(&self.digest_prefix_bytes) {
            return Err(RollError::InvalidPrefixWidth(self.digest_prefix_bytes));
        }
        Ok(())
    }

    /// Theoretical frequency of each color (band width / roll range).
    pub fn theoretical_frequencies(&self) -> BTreeMap<RollColor, f64> {
        RollColor::ALL
            .iter()
            .map(|&color| {
                let width = self.colors.band_width(color, self.roll_range);
                (color, width as f64 / self.roll_range as f64)
            })
            .collect()
    }
}

/// Which forecasting heuristic to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Streak continuation once the streak exceeds the threshold,
    /// regression to the mean otherwise.
    #[default]
    Auto,
    /// Predict the most under-represented color relative to expectation.
    RegressionToMean,
    /// Predict the color of the current streak.
    StreakContinuation,
}

/// Predictor tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Window size for the free tier.
    pub free_window: usize,
    /// Window size for the pro tier.
    pub pro_window: usize,
    /// `Auto` switches to streak continuation once the streak is longer
    /// than this.
    pub streak_threshold: usize,
    /// Heuristic selection.
    pub heuristic: Heuristic,
    /// Half-life (in rolls) of the pro tier recency weighting.
    pub decay_half_life: f64,
    /// Upper bound on reported confidence, strictly below one.
    pub confidence_cap: f64,
    /// Frequencies reported for an empty history. Derived from the color
    /// bands when absent.
    pub default_frequencies: Option<BTreeMap<RollColor, f64>>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            free_window: 50,
            pro_window: 500,
            streak_threshold: 4,
            heuristic: Heuristic::Auto,
            decay_half_life: 50.0,
            confidence_cap: 0.95,
            default_frequencies: None,
        }
    }
}

impl PredictorConfig {
    /// Check window sizes, decay and cap.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(RollError::InvalidPredictorConfig(msg.to_string()));

        if self.free_window == 0 {
            return invalid("free_window must be positive");
        }
        if self.pro_window <= self.free_window {
            return invalid("pro_window must exceed free_window");
        }
        if self.streak_threshold == 0 {
            return invalid("streak_threshold must be positive");
        }
        if !(self.decay_half_life.is_finite() && self.decay_half_life > 0.0) {
            return invalid("decay_half_life must be a positive number");
        }
        if !(self.confidence_cap > 0.0 && self.confidence_cap < 1.0) {
            return invalid("confidence_cap must be inside (0, 1)");
        }
        if let Some(freqs) = &self.default_frequencies {
            if RollColor::ALL.iter().any(|c| !freqs.contains_key(c)) {
                return invalid("default_frequencies must name every color");
            }
            if freqs.values().any(|f| !f.is_finite() || *f < 0.0) {
                return invalid("default_frequencies must be non-negative");
            }
            let sum: f64 = freqs.values().sum();
            if (sum - 1.0).abs() > 1e-6 {
                return invalid("default_frequencies must sum to 1");
            }
        }
        Ok(())
    }

    /// Frequencies to report when there is no history.
    pub fn empty_history_frequencies(&self, game: &RollConfig) -> BTreeMap<RollColor, f64> {
        self.default_frequencies
            .clone()
            .unwrap_or_else(|| game.theoretical_frequencies())
    }
}

/// Full settings bundle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game variant.
    pub game: RollConfig,
    /// Predictor tuning.
    pub predictor: PredictorConfig,
}

impl Settings {
    /// Parse and validate settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| RollError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RollError::Settings(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Load settings from the file named by `ROLL_INTEL_CONFIG`, or defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var(SETTINGS_ENV) {
            Ok(path) if !path.is_empty() => Self::from_path(path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate both halves.
    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        self.predictor.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RollConfig::default().validate().is_ok());
        assert!(PredictorConfig::default().validate().is_ok());
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_theoretical_frequencies() {
        let freqs = RollConfig::default().theoretical_frequencies();
        assert!((freqs[&RollColor::Black] - 0.66).abs() < FREQUENCY_EPSILON);
        assert!((freqs[&RollColor::Yellow] - 0.33).abs() < FREQUENCY_EPSILON);
        assert!((freqs[&RollColor::Dice] - 0.01).abs() < FREQUENCY_EPSILON);
    }

    #[test]
    fn test_bad_bands_rejected() {
        let mut config = RollConfig::default();
        config.colors.black_end = 0;
        assert!(matches!(config.validate(), Err(RollError::InvalidColorBands { .. })));

        let mut config = RollConfig::default();
        config.colors.yellow_end = config.roll_range;
        assert!(matches!(config.validate(), Err(RollError::InvalidColorBands { .. })));

        let mut config = RollConfig::default();
        config.colors.black_end = config.colors.yellow_end;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_prefix_rejected() {
        let mut config = RollConfig::default();
        config.digest_prefix_bytes = 9;
        assert_eq!(config.validate(), Err(RollError::InvalidPrefixWidth(9)));
        config.digest_prefix_bytes = 0;
        assert_eq!(config.validate(), Err(RollError::InvalidPrefixWidth(0)));
    }

    #[test]
    fn test_predictor_config_bounds() {
        let mut config = PredictorConfig::default();
        config.confidence_cap = 1.0;
        assert!(config.validate().is_err());

        let mut config = PredictorConfig::default();
        config.pro_window = config.free_window;
        assert!(config.validate().is_err());

        let mut config = PredictorConfig::default();
        let mut freqs = BTreeMap::new();
        freqs.insert(RollColor::Black, 0.5);
        freqs.insert(RollColor::Yellow, 0.5);
        config.default_frequencies = Some(freqs);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings_from_json() {
        let json = r#"{
            "game": {
                "roll_range": 100,
                "colors": { "black_end": 50, "yellow_end": 90 },
                "message_format": { "format": "client_seed_nonce_round", "round": 3 }
            },
            "predictor": { "free_window": 10, "pro_window": 40, "heuristic": "streak_continuation" }
        }"#;

        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.game.roll_range, 100);
        assert_eq!(settings.game.digest_prefix_bytes, 4);
        assert_eq!(
            settings.game.message_format,
            MessageFormat::ClientSeedNonceRound { round: 3 }
        );
        assert_eq!(settings.predictor.free_window, 10);
        assert_eq!(settings.predictor.heuristic, Heuristic::StreakContinuation);
        assert_eq!(settings.predictor.streak_threshold, 4);
    }

    #[test]
    fn test_settings_rejects_invalid() {
        let json = r#"{ "game": { "roll_range": 2 } }"#;
        assert!(Settings::from_json(json).is_err());
        assert!(matches!(Settings::from_json("not json"), Err(RollError::Settings(_))));
    }
}
