//! The story graph container.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IntegrityIssue, StoryError, StoryResult};
use crate::node::StoryNode;
use crate::value::StatBlock;

/// The complete, read-only set of narrative nodes and their choice edges.
///
/// Loaded once at startup and never mutated during play.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryGraph {
    /// Key of the node a new game begins at.
    pub start: String,
    /// The initial player stat block a new game resets to.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub initial_stats: StatBlock,
    /// All nodes, keyed by their unique string identifiers.
    pub nodes: BTreeMap<String, StoryNode>,
}

impl StoryGraph {
    /// Create an empty graph with the given start key.
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            initial_stats: StatBlock::new(),
            nodes: BTreeMap::new(),
        }
    }

    /// Add a node under the given key.
    pub fn with_node(mut self, key: impl Into<String>, node: StoryNode) -> Self {
        self.nodes.insert(key.into(), node);
        self
    }

    /// Set an initial stat.
    pub fn with_initial_stat(
        mut self,
        stat: impl Into<String>,
        value: impl Into<crate::value::StatValue>,
    ) -> Self {
        self.initial_stats.insert(stat.into(), value.into());
        self
    }

    /// Look up a node by key.
    pub fn get(&self, key: &str) -> Option<&StoryNode> {
        self.nodes.get(key)
    }

    /// Whether a node exists under the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parse a graph from authoring-contract JSON without validating it.
    pub fn from_json(json: &str) -> StoryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a graph from JSON and reject it if validation finds issues.
    pub fn load(json: &str) -> StoryResult<Self> {
        let graph = Self::from_json(json)?;
        let issues = graph.validate();
        if issues.is_empty() {
            Ok(graph)
        } else {
            Err(StoryError::Invalid(issues))
        }
    }

    /// Serialize the graph back to authoring-contract JSON.
    pub fn to_json(&self) -> StoryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every cross-node reference and return all problems found.
    ///
    /// An empty result means the graph is sound: the start node exists,
    /// every choice destination and timeout destination resolves, and every
    /// timed node has a fall-through.
    pub fn validate(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        if !self.contains(&self.start) {
            issues.push(IntegrityIssue::MissingStart(self.start.clone()));
        }

        for (key, node) in &self.nodes {
            for (index, choice) in node.choices.iter().enumerate() {
                if !self.contains(&choice.next_node) {
                    issues.push(IntegrityIssue::DanglingChoice {
                        node: key.clone(),
                        choice: index,
                        target: choice.next_node.clone(),
                    });
                }
            }

            if let Some(target) = &node.timeout_node
                && !self.contains(target)
            {
                issues.push(IntegrityIssue::DanglingTimeout {
                    node: key.clone(),
                    target: target.clone(),
                });
            }

            if node.timer().is_some() && node.timeout_node.is_none() {
                issues.push(IntegrityIssue::TimerWithoutTimeout(key.clone()));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::Choice;

    fn two_node_graph() -> StoryGraph {
        StoryGraph::new("start")
            .with_initial_stat("sanity", 100.0)
            .with_node(
                "start",
                StoryNode::new("Wake up.").with_choice(Choice::new("Obey.", "end")),
            )
            .with_node("end", StoryNode::new("It is over."))
    }

    #[test]
    fn valid_graph_has_no_issues() {
        assert!(two_node_graph().validate().is_empty());
    }

    #[test]
    fn dangling_choice_is_reported() {
        let graph = StoryGraph::new("start").with_node(
            "start",
            StoryNode::new("...").with_choice(Choice::new("Leap.", "nowhere")),
        );
        let issues = graph.validate();
        assert!(issues.contains(&IntegrityIssue::DanglingChoice {
            node: "start".to_string(),
            choice: 0,
            target: "nowhere".to_string(),
        }));
    }

    #[test]
    fn missing_start_is_reported() {
        let graph = StoryGraph::new("absent").with_node("other", StoryNode::new("..."));
        assert!(
            graph
                .validate()
                .contains(&IntegrityIssue::MissingStart("absent".to_string()))
        );
    }

    #[test]
    fn timer_without_timeout_is_reported() {
        let graph = StoryGraph::new("start").with_node(
            "start",
            StoryNode::new("Quick!").with_choice(Choice::new("Act.", "start").with_timer(10.0)),
        );
        assert!(
            graph
                .validate()
                .contains(&IntegrityIssue::TimerWithoutTimeout("start".to_string()))
        );
    }

    #[test]
    fn dangling_timeout_is_reported() {
        let graph = StoryGraph::new("start").with_node(
            "start",
            StoryNode::new("Quick!")
                .with_timeout_node("void")
                .with_choice(Choice::new("Act.", "start").with_timer(10.0)),
        );
        assert!(graph.validate().contains(&IntegrityIssue::DanglingTimeout {
            node: "start".to_string(),
            target: "void".to_string(),
        }));
    }

    #[test]
    fn load_rejects_invalid_graphs() {
        let json = r#"{"start":"start","nodes":{"start":{"text":"...","choices":[{"text":"Go","nextNode":"missing"}]}}}"#;
        match StoryGraph::load(json) {
            Err(StoryError::Invalid(issues)) => assert_eq!(issues.len(), 1),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn json_round_trip() {
        let graph = two_node_graph();
        let json = graph.to_json().unwrap();
        let back = StoryGraph::from_json(&json).unwrap();
        assert_eq!(back, graph);
    }
}
