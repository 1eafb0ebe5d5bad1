//! History analysis.
//!
//! Read-only statistics over the caller's roll history and the forecasting
//! heuristics built on them.

pub mod history;
pub mod predict;
pub mod stats;

pub use history::{HistoryWindow, RollHistory};
pub use predict::{predict, Entitlement, Forecast, OutcomePredictor, SupportingStats, Tier};
pub use stats::{
    analyze, clean_window, summarize, weight_colors, weighted_frequencies, DataQuality, Stats, Streak,
};
