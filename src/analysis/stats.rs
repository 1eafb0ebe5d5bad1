//! Window Statistics
//!
//! Frequency, streak and gap statistics over the tail of a history.
//!
//! Stored color labels are never trusted: each entry's color is recomputed
//! from its roll. Entries whose roll is outside the roll range are skipped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::history::HistoryWindow;
use crate::config::RollConfig;
use crate::core::color::RollColor;

/// Run of identical colors ending at the most recent entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Color of the run.
    pub color: RollColor,
    /// Number of entries in the run.
    pub length: usize,
}

/// Data quality counters for one window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Entries whose stored color disagreed with their roll.
    pub relabelled: usize,
    /// Entries dropped because their roll was out of range.
    pub skipped: usize,
}

/// Statistics over one window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Entries that contributed (after skipping malformed ones).
    pub window_len: usize,
    /// Relative frequency per color; sums to one for a non-empty window.
    pub color_frequencies: BTreeMap<RollColor, f64>,
    /// Current streak, `None` for an empty window.
    pub current_streak: Option<Streak>,
    /// Entries since each color last appeared; `window_len` if absent.
    pub gap_since_last_color: BTreeMap<RollColor, usize>,
    /// Relabelled and skipped entries.
    pub quality: DataQuality,
}

impl Stats {
    /// Frequency of one color.
    pub fn frequency(&self, color: RollColor) -> f64 {
        self.color_frequencies.get(&color).copied().unwrap_or(0.0)
    }
}

/// Colors of the last `window_size` entries, recomputed from their rolls.
///
/// Oldest first.
pub fn clean_window(
    history: HistoryWindow<'_>,
    window_size: usize,
    config: &RollConfig,
) -> (Vec<RollColor>, DataQuality) {
    let mut quality = DataQuality::default();
    let mut colors = Vec::with_capacity(window_size.min(history.len()));

    for entry in history.last(window_size).iter() {
        match entry.relabel(config) {
            Ok(color) => {
                if color != entry.color() {
                    quality.relabelled += 1;
                }
                colors.push(color);
            }
            Err(_) => quality.skipped += 1,
        }
    }

    if quality.relabelled > 0 || quality.skipped > 0 {
        warn!(
            relabelled = quality.relabelled,
            skipped = quality.skipped,
            "malformed entries in roll history"
        );
    }

    (colors, quality)
}

/// Analyze the last `window_size` entries of `history`.
pub fn analyze(history: HistoryWindow<'_>, window_size: usize, config: &RollConfig) -> Stats {
    let (colors, quality) = clean_window(history, window_size, config);
    summarize(&colors, quality)
}

/// Statistics over colors already produced by [`clean_window`].
pub fn summarize(colors: &[RollColor], quality: DataQuality) -> Stats {
    let window_len = colors.len();

    let mut counts: BTreeMap<RollColor, usize> = RollColor::ALL.iter().map(|&c| (c, 0)).collect();
    for color in colors {
        *counts.entry(*color).or_insert(0) += 1;
    }

    let color_frequencies = counts
        .iter()
        .map(|(&color, &count)| {
            let freq = if window_len == 0 {
                0.0
            } else {
                count as f64 / window_len as f64
            };
            (color, freq)
        })
        .collect();

    let current_streak = colors.last().map(|&color| Streak {
        color,
        length: colors.iter().rev().take_while(|&&c| c == color).count(),
    });

    let gap_since_last_color = RollColor::ALL
        .iter()
        .map(|&color| {
            let gap = colors
                .iter()
                .rev()
                .position(|&c| c == color)
                .unwrap_or(window_len);
            (color, gap)
        })
        .collect();

    Stats {
        window_len,
        color_frequencies,
        current_streak,
        gap_since_last_color,
        quality,
    }
}

/// Recency-weighted color frequencies.
///
/// The most recent entry has weight 1 and weights halve every
/// `half_life` entries. Returns `None` for an empty window.
pub fn weighted_frequencies(
    history: HistoryWindow<'_>,
    window_size: usize,
    half_life: f64,
    config: &RollConfig,
) -> Option<BTreeMap<RollColor, f64>> {
    let (colors, _) = clean_window(history, window_size, config);
    weight_colors(&colors, half_life)
}

/// Recency-weighted frequencies over colors already produced by
/// [`clean_window`], oldest first.
pub fn weight_colors(colors: &[RollColor], half_life: f64) -> Option<BTreeMap<RollColor, f64>> {
    if colors.is_empty() || half_life.is_nan() || half_life <= 0.0 {
        return None;
    }

    let decay = 0.5f64.powf(1.0 / half_life);
    let mut weights: BTreeMap<RollColor, f64> = RollColor::ALL.iter().map(|&c| (c, 0.0)).collect();
    let mut total = 0.0;
    let mut weight = 1.0;

    for color in colors.iter().rev() {
        *weights.entry(*color).or_insert(0.0) += weight;
        total += weight;
        weight *= decay;
    }

    Some(weights.into_iter().map(|(c, w)| (c, w / total)).collect())
}
