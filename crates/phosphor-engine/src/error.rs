//! Error types for the engine.

use thiserror::Error;

use crate::save::SaveError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while driving a game session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A choice was made with no node current (e.g. before `start`).
    #[error("no active node")]
    NoActiveNode,

    /// A choice index outside the eligible list was selected.
    #[error("invalid choice: {0}")]
    InvalidChoice(usize),

    /// Story loading or validation failed.
    #[error(transparent)]
    Story(#[from] phosphor_story::StoryError),

    /// Save storage failed. Usually logged and swallowed rather than raised.
    #[error(transparent)]
    Save(#[from] SaveError),
}
