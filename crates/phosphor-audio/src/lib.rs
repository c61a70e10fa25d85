//! Audio director for Phosphor.
//!
//! A single background track plays at a time. Track changes crossfade: the
//! outgoing track fades to silence over a fixed duration, then the incoming
//! one fades up to the configured volume. Until the host delivers a
//! user-gesture unlock, requests are queued (latest wins) instead of
//! attempted, because autoplay may be blocked. Playback failures are logged
//! and swallowed; the game stays fully playable in silence.

/// Playback backends.
pub mod backend;
/// The crossfade state machine.
pub mod director;
/// Error types for audio playback.
pub mod error;
#[cfg(feature = "playback")]
/// Real playback through rodio.
pub mod rodio_backend;

pub use backend::{Backend, NullBackend};
pub use director::{AudioDirector, FADE_SECS};
pub use error::{AudioError, AudioResult};
#[cfg(feature = "playback")]
pub use rodio_backend::RodioBackend;
