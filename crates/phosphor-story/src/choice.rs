//! Choices and their gating requirements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{StatBlock, StatValue};

/// A gating predicate evaluated against a single player stat.
///
/// Authored as `true`/`false`, `{"lessThan": n}`, or `{"greaterThan": n}`.
/// One clause is one predicate: a clause carrying extra keys (such as both
/// bounds at once) is rejected at parse time rather than partially honored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RequirementRepr", into = "RequirementRepr")]
pub enum Requirement {
    /// The stat must be a flag with exactly this value.
    Equals(bool),
    /// The stat must exist, be numeric, and be strictly less than the bound.
    LessThan {
        /// Exclusive upper bound.
        less_than: f64,
    },
    /// The stat must exist, be numeric, and be strictly greater than the bound.
    GreaterThan {
        /// Exclusive lower bound.
        greater_than: f64,
    },
}

/// The raw authored shape, validated into [`Requirement`] on the way in.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RequirementRepr {
    Flag(bool),
    Bounds(BTreeMap<String, f64>),
}

impl TryFrom<RequirementRepr> for Requirement {
    type Error = String;

    fn try_from(repr: RequirementRepr) -> Result<Self, Self::Error> {
        match repr {
            RequirementRepr::Flag(flag) => Ok(Requirement::Equals(flag)),
            RequirementRepr::Bounds(map) => {
                let mut entries = map.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((key, bound)), None) => match key.as_str() {
                        "lessThan" => Ok(Requirement::LessThan { less_than: bound }),
                        "greaterThan" => Ok(Requirement::GreaterThan {
                            greater_than: bound,
                        }),
                        other => Err(format!("unknown requirement key \"{other}\"")),
                    },
                    _ => Err("a requirement clause must carry exactly one key".to_string()),
                }
            }
        }
    }
}

impl From<Requirement> for RequirementRepr {
    fn from(req: Requirement) -> Self {
        match req {
            Requirement::Equals(flag) => RequirementRepr::Flag(flag),
            Requirement::LessThan { less_than } => {
                RequirementRepr::Bounds([("lessThan".to_string(), less_than)].into())
            }
            Requirement::GreaterThan { greater_than } => {
                RequirementRepr::Bounds([("greaterThan".to_string(), greater_than)].into())
            }
        }
    }
}

impl Requirement {
    /// Evaluate against the player's value for the stat, if any.
    ///
    /// A missing stat fails every requirement: numeric bounds never treat
    /// "unset" as zero, and flag equality demands an explicit flag.
    pub fn satisfied_by(&self, value: Option<&StatValue>) -> bool {
        match (self, value) {
            (Requirement::Equals(want), Some(StatValue::Flag(have))) => want == have,
            (Requirement::LessThan { less_than }, Some(StatValue::Number(n))) => n < less_than,
            (Requirement::GreaterThan { greater_than }, Some(StatValue::Number(n))) => {
                n > greater_than
            }
            _ => false,
        }
    }
}

/// One outgoing edge of a story node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// The text shown to the player.
    pub text: String,
    /// Key of the destination node. Must exist in the graph; a dangling key
    /// is a content-integrity error reported by validation.
    pub next_node: String,
    /// Countdown in seconds. If any choice in a node carries a timer, the
    /// node is timed and falls through to its `timeout_node` on expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<f32>,
    /// Requirements that must all hold for this choice to be offered.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requires: BTreeMap<String, Requirement>,
    /// Stat deltas applied when this choice is taken.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub set_stats: StatBlock,
}

impl Choice {
    /// Create a choice with the given text and destination.
    pub fn new(text: impl Into<String>, next_node: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_node: next_node.into(),
            timer: None,
            requires: BTreeMap::new(),
            set_stats: StatBlock::new(),
        }
    }

    /// Set the countdown timer in seconds.
    pub fn with_timer(mut self, seconds: f32) -> Self {
        self.timer = Some(seconds);
        self
    }

    /// Add a requirement on a stat.
    pub fn with_requirement(mut self, stat: impl Into<String>, req: Requirement) -> Self {
        self.requires.insert(stat.into(), req);
        self
    }

    /// Add a stat delta applied when the choice is taken.
    pub fn with_stat(mut self, stat: impl Into<String>, value: impl Into<StatValue>) -> Self {
        self.set_stats.insert(stat.into(), value.into());
        self
    }

    /// Whether every requirement is satisfied by the given lookup.
    pub fn meets_requirements<'a, F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<&'a StatValue>,
    {
        self.requires
            .iter()
            .all(|(stat, req)| req.satisfied_by(lookup(stat)))
    }
}
