//! Stat values and stat blocks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single stat value: either a numeric quantity or a boolean flag.
///
/// In a [`StatBlock`] a `Number` is a *relative* delta (applied with `+=`
/// semantics) while a `Flag` is an absolute overwrite. In player state both
/// are absolute values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    /// A boolean flag, e.g. "hasKey".
    Flag(bool),
    /// A numeric quantity, e.g. "sanity".
    Number(f64),
}

impl StatValue {
    /// Numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => Some(*n),
            StatValue::Flag(_) => None,
        }
    }

    /// Flag value, if this is a flag.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            StatValue::Flag(b) => Some(*b),
            StatValue::Number(_) => None,
        }
    }
}

impl From<f64> for StatValue {
    fn from(n: f64) -> Self {
        StatValue::Number(n)
    }
}

impl From<bool> for StatValue {
    fn from(b: bool) -> Self {
        StatValue::Flag(b)
    }
}

/// An ordered mapping of stat names to values, as authored in
/// `onLoad.setStats` and `Choice::set_stats`.
pub type StatBlock = BTreeMap<String, StatValue>;

/// Build a [`StatBlock`] from `(name, value)` pairs.
pub fn stat_block<K, V, I>(entries: I) -> StatBlock
where
    K: Into<String>,
    V: Into<StatValue>,
    I: IntoIterator<Item = (K, V)>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_round_trip() {
        let block = stat_block([("sanity", StatValue::Number(-20.0))]);
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, r#"{"sanity":-20.0}"#);

        let back: StatBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn flags_deserialize_as_flags() {
        let block: StatBlock = serde_json::from_str(r#"{"hasKey":true,"sanity":5}"#).unwrap();
        assert_eq!(block["hasKey"], StatValue::Flag(true));
        assert_eq!(block["sanity"], StatValue::Number(5.0));
    }

    #[test]
    fn accessors() {
        assert_eq!(StatValue::Number(3.0).as_number(), Some(3.0));
        assert_eq!(StatValue::Number(3.0).as_flag(), None);
        assert_eq!(StatValue::Flag(true).as_flag(), Some(true));
        assert_eq!(StatValue::Flag(true).as_number(), None);
    }
}
