//! Error types for audio playback.

use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors a playback backend can raise.
///
/// None of these are fatal to a session; the director logs and continues.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The referenced asset could not be opened.
    #[error("audio asset not found: {0}")]
    AssetNotFound(String),

    /// The asset could not be decoded.
    #[error("cannot decode audio asset {asset}: {reason}")]
    Decode {
        /// The asset identifier.
        asset: String,
        /// Backend-specific detail.
        reason: String,
    },

    /// The output device refused playback (e.g. blocked autoplay, no device).
    #[error("playback unavailable: {0}")]
    Unavailable(String),
}
