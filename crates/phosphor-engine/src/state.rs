//! The player state store.

use serde::{Deserialize, Serialize};

use phosphor_story::{StatBlock, StatValue};

/// The player's stats: a mapping from stat name to number or flag.
///
/// Owned and mutated exclusively by the
/// [`GameController`](crate::GameController); renderers get read-only
/// snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerState {
    stats: StatBlock,
}

impl PlayerState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state from an authored initial stat block.
    pub fn from_initial(initial: &StatBlock) -> Self {
        let mut state = Self::new();
        state.apply(initial);
        state
    }

    /// Get a stat's value.
    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.stats.get(key)
    }

    /// Get a stat as a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(StatValue::as_number)
    }

    /// Get a stat as a flag.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(StatValue::as_flag)
    }

    /// Apply a stat block.
    ///
    /// Numeric entries are relative deltas: the current value is taken as
    /// `0` when the stat is unset or non-numeric, so a delta on a fresh stat
    /// yields exactly that delta and the result is never NaN. Flag entries
    /// overwrite, never accumulate.
    pub fn apply(&mut self, block: &StatBlock) {
        for (key, value) in block {
            match value {
                StatValue::Number(delta) => {
                    let base = self.number(key).unwrap_or(0.0);
                    self.stats
                        .insert(key.clone(), StatValue::Number(base + delta));
                }
                StatValue::Flag(flag) => {
                    self.stats.insert(key.clone(), StatValue::Flag(*flag));
                }
            }
        }
    }

    /// Entries worth displaying: every number, plus flags that are set.
    /// Unset and `false` flags are skipped.
    pub fn readout(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.stats
            .iter()
            .filter(|(_, v)| !matches!(v, StatValue::Flag(false)))
            .map(|(k, v)| (k.as_str(), v))
    }
}
