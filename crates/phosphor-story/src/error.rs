//! Error and integrity-diagnostic types.

use thiserror::Error;

/// Result type for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors raised when loading or checking a story graph.
#[derive(Debug, Error)]
pub enum StoryError {
    /// The JSON did not conform to the authoring contract.
    #[error("story parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The graph failed content-integrity validation.
    #[error("story failed validation with {} issue(s)", .0.len())]
    Invalid(Vec<IntegrityIssue>),
}

/// A single content-integrity problem found by validation.
///
/// These are diagnostics for story authors; at play time a dangling
/// reference degrades to the in-fiction broken-path scene instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityIssue {
    /// The designated start key has no node.
    #[error("start node \"{0}\" does not exist")]
    MissingStart(String),

    /// A choice points at a key with no node.
    #[error("node \"{node}\" choice {choice} points at missing node \"{target}\"")]
    DanglingChoice {
        /// Node containing the choice.
        node: String,
        /// Zero-based index of the choice.
        choice: usize,
        /// The missing destination key.
        target: String,
    },

    /// A `timeoutNode` points at a key with no node.
    #[error("node \"{node}\" timeout points at missing node \"{target}\"")]
    DanglingTimeout {
        /// Node carrying the timeout.
        node: String,
        /// The missing destination key.
        target: String,
    },

    /// A choice carries a timer but the node has nowhere to fall through to.
    #[error("node \"{0}\" has a timed choice but no timeoutNode")]
    TimerWithoutTimeout(String),
}
