//! Playback backends.

use crate::error::AudioResult;

/// Low-level playback surface the director drives.
///
/// Implementations hold the actual output device. The director owns all
/// policy: unlock gating, queuing, crossfade timing, and volume math.
pub trait Backend {
    /// Start looping the named background track at gain 0.
    fn start(&mut self, track: &str) -> AudioResult<()>;

    /// Fire a one-shot sound cue at the current gain.
    fn start_cue(&mut self, cue: &str) -> AudioResult<()>;

    /// Stop the background track, if any.
    fn stop(&mut self);

    /// Set the background track's gain (0.0–1.0).
    fn set_gain(&mut self, gain: f32);
}

/// A backend that plays nothing. Used when no sound device is available and
/// as the default for headless runs; every operation succeeds silently.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl Backend for NullBackend {
    fn start(&mut self, _track: &str) -> AudioResult<()> {
        Ok(())
    }

    fn start_cue(&mut self, _cue: &str) -> AudioResult<()> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn set_gain(&mut self, _gain: f32) {}
}
