//! Story graph data model for Phosphor.
//!
//! A story is an immutable graph of [`StoryNode`]s keyed by string, each
//! carrying narrative text, optional presentation directives, stat effects,
//! and zero or more outgoing [`Choice`]s. The graph is the content-authoring
//! contract: writers produce JSON conforming to these shapes, and
//! [`StoryGraph::validate`] reports every dangling reference before play.

/// Choices and their gating requirements.
pub mod choice;
/// A built-in demo story.
pub mod demo;
/// Error and integrity-diagnostic types.
pub mod error;
/// The story graph container.
pub mod graph;
/// Story nodes and presentation directives.
pub mod node;
/// Stat values and stat blocks.
pub mod value;

pub use choice::{Choice, Requirement};
pub use demo::demo_story;
pub use error::{IntegrityIssue, StoryError, StoryResult};
pub use graph::StoryGraph;
pub use node::{Background, Effects, MusicCue, Presentation, StoryNode};
pub use value::{StatBlock, StatValue};
