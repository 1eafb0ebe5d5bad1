//! Roll History
//!
//! Append-only log of past outcomes, owned by the caller. The analysis code
//! only ever reads it through a borrowed [`HistoryWindow`].

use serde::{Deserialize, Serialize};

use crate::config::RollConfig;
use crate::core::color::RollResult;
use crate::error::Result;

/// Append-only sequence of results, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollHistory {
    entries: Vec<RollResult>,
}

impl RollHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result.
    pub fn push(&mut self, result: RollResult) {
        self.entries.push(result);
    }

    /// Append a roll, deriving its color.
    pub fn push_roll(&mut self, roll: u32, config: &RollConfig) -> Result<RollResult> {
        let result = RollResult::from_roll(roll, config)?;
        self.entries.push(result);
        Ok(result)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries yet?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view of every entry.
    pub fn snapshot(&self) -> HistoryWindow<'_> {
        HistoryWindow::new(&self.entries)
    }

    /// Read-only view of the last `n` entries.
    pub fn window(&self, n: usize) -> HistoryWindow<'_> {
        self.snapshot().last(n)
    }
}

impl Extend<RollResult> for RollHistory {
    fn extend<T: IntoIterator<Item = RollResult>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl FromIterator<RollResult> for RollHistory {
    fn from_iter<T: IntoIterator<Item = RollResult>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Borrowed, most-recent-last view of a history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryWindow<'a> {
    entries: &'a [RollResult],
}

impl<'a> HistoryWindow<'a> {
    /// View over a slice.
    pub fn new(entries: &'a [RollResult]) -> Self {
        Self { entries }
    }

    /// The last `n` entries, or all of them if there are fewer.
    pub fn last(&self, n: usize) -> HistoryWindow<'a> {
        let start = self.entries.len().saturating_sub(n);
        Self::new(&self.entries[start..])
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Empty view?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, oldest first.
    pub fn as_slice(&self) -> &'a [RollResult] {
        self.entries
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> std::slice::Iter<'a, RollResult> {
        self.entries.iter()
    }
}

impl<'a> From<&'a [RollResult]> for HistoryWindow<'a> {
    fn from(entries: &'a [RollResult]) -> Self {
        Self::new(entries)
    }
}

impl<'a> From<&'a RollHistory> for HistoryWindow<'a> {
    fn from(history: &'a RollHistory) -> Self {
        history.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::RollColor;

    fn history(rolls: &[u32]) -> RollHistory {
        let config = RollConfig::default();
        let mut history = RollHistory::new();
        for &roll in rolls {
            history.push_roll(roll, &config).unwrap();
        }
        history
    }

    #[test]
    fn test_push_roll_derives_color() {
        let mut history = RollHistory::new();
        let result = history.push_roll(9_950, &RollConfig::default()).unwrap();
        assert_eq!(result.color(), RollColor::Dice);
        assert_eq!(history.len(), 1);
        assert!(history.push_roll(10_000, &RollConfig::default()).is_err());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_window_takes_most_recent() {
        let history = history(&[1, 2, 3, 4, 5]);
        let window = history.window(3);
        let rolls: Vec<u32> = window.iter().map(|r| r.roll()).collect();
        assert_eq!(rolls, vec![3, 4, 5]);

        assert_eq!(history.window(50).len(), 5);
        assert!(history.window(0).is_empty());
    }

    #[test]
    fn test_serde_transparent() {
        let history = history(&[10, 7000]);
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(
            json,
            r#"[{"roll":10,"color":"black"},{"roll":7000,"color":"yellow"}]"#
        );
        let back: RollHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
    }
}
