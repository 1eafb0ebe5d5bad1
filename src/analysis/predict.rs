//! Outcome Forecasting
//!
//! Statistical heuristics over recent history. Rolls are generated
//! independently, so a forecast is a description of recent data and not a
//! guarantee of anything; [`Forecast::disclaimer`] carries the wording the
//! presentation layer must show.
//!
//! The entitlement tier only selects the window size and whether recency
//! weighting is applied. It is passed in explicitly on every call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::history::HistoryWindow;
use crate::analysis::stats::{clean_window, summarize, weight_colors, DataQuality, Stats, Streak};
use crate::config::{Heuristic, PredictorConfig, RollConfig, Settings};
use crate::core::color::RollColor;
use crate::error::Result;

/// Shown alongside every forecast.
pub const DISCLAIMER: &str = "Forecasts are statistical heuristics over past rolls. \
Each roll is derived independently from committed seeds, so past results do not \
change the odds of the next one.";

/// Hard ceiling on confidence, whatever the configured cap.
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Analytical depth the caller is entitled to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Short window, plain frequencies.
    #[default]
    Free,
    /// Long window, recency-weighted frequencies.
    Pro,
}

/// Entitlement supplied by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Tier in effect.
    pub tier: Tier,
}

impl Entitlement {
    /// Free tier.
    pub const FREE: Entitlement = Entitlement { tier: Tier::Free };
    /// Pro tier.
    pub const PRO: Entitlement = Entitlement { tier: Tier::Pro };

    /// Window size for this tier.
    pub fn window_size(&self, config: &PredictorConfig) -> usize {
        match self.tier {
            Tier::Free => config.free_window,
            Tier::Pro => config.pro_window,
        }
    }
}

/// Statistics backing a forecast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupportingStats {
    /// Plain relative frequency per color over the window.
    pub color_frequencies: BTreeMap<RollColor, f64>,
    /// Current streak, `None` without history.
    pub current_streak: Option<Streak>,
    /// Entries since each color last appeared (pro only).
    pub gap_since_last_color: Option<BTreeMap<RollColor, usize>>,
    /// Recency-weighted frequencies (pro only).
    pub weighted_frequencies: Option<BTreeMap<RollColor, f64>>,
    /// Entries relabelled or skipped while reading the window.
    pub data_quality: DataQuality,
}

/// Forecast for the next roll.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Most likely color under the applied heuristic.
    pub predicted_color: RollColor,
    /// Confidence in `[0, confidence_cap]`, always below one.
    pub confidence: f64,
    /// Statistics the forecast was built from.
    pub supporting_stats: SupportingStats,
    /// Tier that produced the forecast.
    pub tier: Tier,
    /// Effective window size for the tier.
    pub window_size: usize,
    /// Entries actually analyzed.
    pub sample_size: usize,
    /// Heuristic applied (`None` when there was no history).
    pub heuristic: Option<Heuristic>,
}

impl Forecast {
    /// Text to show next to any forecast.
    pub fn disclaimer() -> &'static str {
        DISCLAIMER
    }
}

/// Relative deviation of an observed frequency from its expectation.
#[inline]
fn deviation(observed: f64, expected: f64) -> f64 {
    if expected <= 0.0 {
        return 0.0;
    }
    (observed - expected).abs() / expected
}

/// Color whose observed frequency falls furthest short of expectation.
///
/// Ties go to the earlier band.
fn most_underrepresented(
    observed: &BTreeMap<RollColor, f64>,
    expected: &BTreeMap<RollColor, f64>,
) -> RollColor {
    let mut best = RollColor::Black;
    let mut best_ratio = f64::INFINITY;
    for color in RollColor::ALL {
        let exp = expected.get(&color).copied().unwrap_or(0.0);
        if exp <= 0.0 {
            continue;
        }
        let ratio = observed.get(&color).copied().unwrap_or(0.0) / exp;
        if ratio < best_ratio {
            best = color;
            best_ratio = ratio;
        }
    }
    best
}

/// Color with the largest expected frequency.
fn most_likely(expected: &BTreeMap<RollColor, f64>) -> RollColor {
    let mut best = RollColor::Black;
    let mut best_freq = f64::NEG_INFINITY;
    for (&color, &freq) in expected {
        if freq > best_freq {
            best = color;
            best_freq = freq;
        }
    }
    best
}

/// Bound a configured cap to `[0, MAX_CONFIDENCE]`.
fn effective_cap(cap: f64) -> f64 {
    if cap.is_nan() {
        return 0.0;
    }
    cap.clamp(0.0, MAX_CONFIDENCE)
}

/// Forecaster bound to a game variant and tuning.
#[derive(Clone, Debug, Default)]
pub struct OutcomePredictor {
    game: RollConfig,
    config: PredictorConfig,
}

impl OutcomePredictor {
    /// Build a predictor, validating both configs.
    pub fn new(game: RollConfig, config: PredictorConfig) -> Result<Self> {
        game.validate()?;
        config.validate()?;
        Ok(Self { game, config })
    }

    /// Build a predictor from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.game.clone(), settings.predictor.clone())
    }

    /// Predictor tuning in use.
    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Game variant in use.
    pub fn game(&self) -> &RollConfig {
        &self.game
    }

    /// Forecast the next roll. Never fails; an empty history gives a
    /// zero-confidence forecast.
    pub fn predict(&self, history: HistoryWindow<'_>, entitlement: Entitlement) -> Forecast {
        let window_size = entitlement.window_size(&self.config);
        let expected = self.config.empty_history_frequencies(&self.game);
        let (colors, quality) = clean_window(history, window_size, &self.game);
        let stats = summarize(&colors, quality);

        if stats.window_len == 0 {
            return self.empty_forecast(entitlement.tier, window_size, expected, quality);
        }

        let weighted = match entitlement.tier {
            Tier::Free => None,
            Tier::Pro => weight_colors(&colors, self.config.decay_half_life),
        };
        let model = weighted.as_ref().unwrap_or(&stats.color_frequencies);

        let heuristic = self.select_heuristic(&stats);
        let predicted_color = match (heuristic, stats.current_streak) {
            (Heuristic::StreakContinuation, Some(streak)) => streak.color,
            _ => most_underrepresented(model, &expected),
        };

        let observed = model.get(&predicted_color).copied().unwrap_or(0.0);
        let exp = expected.get(&predicted_color).copied().unwrap_or(0.0);
        let confidence = deviation(observed, exp).min(effective_cap(self.config.confidence_cap));

        debug!(
            tier = ?entitlement.tier,
            window_size,
            sample_size = stats.window_len,
            ?heuristic,
            %predicted_color,
            confidence,
            "forecast computed"
        );

        let gaps = match entitlement.tier {
            Tier::Free => None,
            Tier::Pro => Some(stats.gap_since_last_color.clone()),
        };

        Forecast {
            predicted_color,
            confidence,
            supporting_stats: SupportingStats {
                color_frequencies: stats.color_frequencies,
                current_streak: stats.current_streak,
                gap_since_last_color: gaps,
                weighted_frequencies: weighted,
                data_quality: stats.quality,
            },
            tier: entitlement.tier,
            window_size,
            sample_size: stats.window_len,
            heuristic: Some(heuristic),
        }
    }

    /// Resolve `Auto` against the current streak.
    fn select_heuristic(&self, stats: &Stats) -> Heuristic {
        match self.config.heuristic {
            Heuristic::Auto => match stats.current_streak {
                Some(streak) if streak.length > self.config.streak_threshold => {
                    Heuristic::StreakContinuation
                }
                _ => Heuristic::RegressionToMean,
            },
            explicit => explicit,
        }
    }

    fn empty_forecast(
        &self,
        tier: Tier,
        window_size: usize,
        frequencies: BTreeMap<RollColor, f64>,
        quality: DataQuality,
    ) -> Forecast {
        debug!(?tier, "no usable history, returning default forecast");
        Forecast {
            predicted_color: most_likely(&frequencies),
            confidence: 0.0,
            supporting_stats: SupportingStats {
                color_frequencies: frequencies,
                current_streak: None,
                gap_since_last_color: None,
                weighted_frequencies: None,
                data_quality: quality,
            },
            tier,
            window_size,
            sample_size: 0,
            heuristic: None,
        }
    }
}

/// Forecast with explicit settings.
///
/// Invalid settings are logged and produce a zero-confidence forecast over
/// a uniform distribution.
pub fn predict(history: HistoryWindow<'_>, entitlement: Entitlement, settings: &Settings) -> Forecast {
    match OutcomePredictor::from_settings(settings) {
        Ok(predictor) => predictor.predict(history, entitlement),
        Err(error) => {
            warn!(%error, "invalid predictor settings");
            let uniform = RollColor::ALL
                .iter()
                .map(|&c| (c, 1.0 / RollColor::ALL.len() as f64))
                .collect();
            let window_size = entitlement.window_size(&settings.predictor);
            OutcomePredictor::default().empty_forecast(
                entitlement.tier,
                window_size,
                uniform,
                DataQuality::default(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::history::RollHistory;
    use crate::core::color::RollResult;

    const B: u32 = 100;
    const Y: u32 = 7_000;
    const D: u32 = 9_950;

    fn history(rolls: &[u32]) -> RollHistory {
        let config = RollConfig::default();
        rolls
            .iter()
            .map(|&r| RollResult::from_roll(r, &config).unwrap())
            .collect()
    }

    fn predictor(heuristic: Heuristic) -> OutcomePredictor {
        let config = PredictorConfig {
            heuristic,
            ..PredictorConfig::default()
        };
        OutcomePredictor::new(RollConfig::default(), config).unwrap()
    }

    #[test]
    fn test_empty_history() {
        let predictor = OutcomePredictor::default();
        let forecast = predictor.predict(HistoryWindow::new(&[]), Entitlement::FREE);

        assert_eq!(forecast.confidence, 0.0);
        assert_eq!(forecast.sample_size, 0);
        assert_eq!(forecast.heuristic, None);
        assert_eq!(forecast.predicted_color, RollColor::Black);
        assert_eq!(
            forecast.supporting_stats.color_frequencies,
            RollConfig::default().theoretical_frequencies()
        );
    }

    #[test]
    fn test_regression_to_mean() {
        // Yellow-heavy window: black is furthest below its 66%
        let history = history(&[Y, Y, B, Y, Y, B, Y, D]);
        let forecast = predictor(Heuristic::RegressionToMean)
            .predict(history.snapshot(), Entitlement::FREE);

        assert_eq!(forecast.predicted_color, RollColor::Black);
        // observed 0.25 vs expected 0.66
        let expected = (0.25f64 - 0.66).abs() / 0.66;
        assert!((forecast.confidence - expected).abs() < 1e-9);
        assert_eq!(forecast.heuristic, Some(Heuristic::RegressionToMean));
    }

    #[test]
    fn test_streak_continuation() {
        let history = history(&[B, B, Y, Y, Y, Y, Y]);
        let forecast = predictor(Heuristic::StreakContinuation)
            .predict(history.snapshot(), Entitlement::FREE);

        assert_eq!(forecast.predicted_color, RollColor::Yellow);
        assert_eq!(
            forecast.supporting_stats.current_streak,
            Some(Streak { color: RollColor::Yellow, length: 5 })
        );
    }

    #[test]
    fn test_auto_switches_on_threshold() {
        let predictor = predictor(Heuristic::Auto);

        let short = history(&[B, B, B, B, B, Y, Y]);
        let forecast = predictor.predict(short.snapshot(), Entitlement::FREE);
        assert_eq!(forecast.heuristic, Some(Heuristic::RegressionToMean));

        // Exactly the threshold (4) is not enough
        let at_threshold = history(&[B, B, Y, Y, Y, Y]);
        let forecast = predictor.predict(at_threshold.snapshot(), Entitlement::FREE);
        assert_eq!(forecast.heuristic, Some(Heuristic::RegressionToMean));

        let long = history(&[B, B, Y, Y, Y, Y, Y]);
        let forecast = predictor.predict(long.snapshot(), Entitlement::FREE);
        assert_eq!(forecast.heuristic, Some(Heuristic::StreakContinuation));
        assert_eq!(forecast.predicted_color, RollColor::Yellow);
    }

    #[test]
    fn test_confidence_is_capped() {
        // Dice expected at 1%, observed at 100%
        let history = history(&[D, D, D]);
        let forecast = predictor(Heuristic::StreakContinuation)
            .predict(history.snapshot(), Entitlement::FREE);

        assert_eq!(forecast.predicted_color, RollColor::Dice);
        assert_eq!(forecast.confidence, PredictorConfig::default().confidence_cap);
        assert!(forecast.confidence < 1.0);
    }

    #[test]
    fn test_tier_window_sizes() {
        let mut rolls = vec![D; 100];
        rolls.extend(vec![B; 50]);
        let history = history(&rolls);
        let predictor = OutcomePredictor::default();

        let free = predictor.predict(history.snapshot(), Entitlement::FREE);
        let pro = predictor.predict(history.snapshot(), Entitlement::PRO);

        assert_eq!(free.window_size, 50);
        assert_eq!(pro.window_size, 500);
        assert_eq!(free.sample_size, 50);
        assert_eq!(pro.sample_size, 150);
        assert_eq!(free.supporting_stats.color_frequencies[&RollColor::Dice], 0.0);
        assert!(pro.supporting_stats.color_frequencies[&RollColor::Dice] > 0.6);

        assert!(free.supporting_stats.weighted_frequencies.is_none());
        assert!(free.supporting_stats.gap_since_last_color.is_none());
        assert!(pro.supporting_stats.weighted_frequencies.is_some());
        assert_eq!(
            pro.supporting_stats.gap_since_last_color.as_ref().unwrap()[&RollColor::Dice],
            50
        );
    }

    #[test]
    fn test_pro_forecast_counts_malformed_entries_once() {
        let stored: Vec<RollResult> = serde_json::from_str(
            r#"[
                {"roll": 100, "color": "black"},
                {"roll": 7000, "color": "black"},
                {"roll": 50000, "color": "dice"},
                {"roll": 9950, "color": "dice"}
            ]"#,
        )
        .unwrap();
        let predictor = OutcomePredictor::default();

        let pro = predictor.predict(HistoryWindow::new(&stored), Entitlement::PRO);
        assert_eq!(pro.supporting_stats.data_quality, DataQuality { relabelled: 1, skipped: 1 });
        assert_eq!(pro.sample_size, 3);

        let weighted = pro.supporting_stats.weighted_frequencies.unwrap();
        let sum: f64 = weighted.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(weighted[&RollColor::Yellow] > 0.0);

        let free = predictor.predict(HistoryWindow::new(&stored), Entitlement::FREE);
        assert_eq!(free.supporting_stats.data_quality, pro.supporting_stats.data_quality);
    }

    #[test]
    fn test_all_entries_skipped() {
        let stored: Vec<RollResult> =
            serde_json::from_str(r#"[{"roll": 20000, "color": "black"}]"#).unwrap();
        let forecast = OutcomePredictor::default().predict(HistoryWindow::new(&stored), Entitlement::PRO);

        assert_eq!(forecast.confidence, 0.0);
        assert_eq!(forecast.sample_size, 0);
        assert_eq!(forecast.supporting_stats.data_quality.skipped, 1);
    }

    #[test]
    fn test_invalid_settings_still_forecast() {
        let mut settings = Settings::default();
        settings.predictor.confidence_cap = 2.0;

        let history = history(&[B, Y]);
        let forecast = predict(history.snapshot(), Entitlement::PRO, &settings);
        assert_eq!(forecast.confidence, 0.0);
        assert_eq!(forecast.window_size, 500);
    }

    #[test]
    fn test_forecast_json() {
        let history = history(&[B, Y, D]);
        let forecast = OutcomePredictor::default().predict(history.snapshot(), Entitlement::PRO);
        let json = serde_json::to_value(&forecast).unwrap();

        assert_eq!(json["tier"], "pro");
        assert!(json["supporting_stats"]["color_frequencies"]["black"].is_number());
        assert!(!Forecast::disclaimer().is_empty());
    }
}
