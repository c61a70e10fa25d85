//! User settings, independent of story state.
//!
//! Text-reveal speed and volume are player preferences, not game state: they
//! are loaded once at startup, applied immediately, and re-persisted
//! whenever changed. Each lives under its own key (one small JSON file per
//! setting) so a corrupt value only loses that one preference.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// File name for the persisted text-speed preference.
const TEXT_SPEED_KEY: &str = "text-speed.json";
/// File name for the persisted volume preference.
const VOLUME_KEY: &str = "volume.json";

/// Minimum and maximum text-reveal speed, in characters per second.
const TEXT_SPEED_RANGE: (f32, f32) = (5.0, 200.0);

/// Player preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Typewriter reveal speed, characters per second.
    pub text_speed: f32,
    /// Music volume, 0.0–1.0.
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            text_speed: 50.0,
            volume: phosphor_audio::director::DEFAULT_VOLUME,
        }
    }
}

impl Settings {
    /// Seconds between revealed characters at the current speed.
    pub fn char_delay(&self) -> f32 {
        1.0 / self.text_speed
    }

    /// Set the reveal speed, clamped to a usable range.
    pub fn set_text_speed(&mut self, chars_per_sec: f32) {
        self.text_speed = chars_per_sec.clamp(TEXT_SPEED_RANGE.0, TEXT_SPEED_RANGE.1);
    }

    /// Set the volume, clamped to 0.0–1.0.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Nudge the volume by a delta, clamped.
    pub fn step_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    /// Scale the reveal speed by a factor, clamped.
    pub fn step_text_speed(&mut self, factor: f32) {
        self.set_text_speed(self.text_speed * factor);
    }

    /// Load settings from the given directory, falling back to defaults for
    /// any key that is missing or unreadable.
    pub fn load_from(dir: &Path) -> Self {
        let mut settings = Self::default();
        if let Some(speed) = read_key(&dir.join(TEXT_SPEED_KEY)) {
            settings.set_text_speed(speed);
        }
        if let Some(volume) = read_key(&dir.join(VOLUME_KEY)) {
            settings.set_volume(volume);
        }
        settings
    }

    /// Persist both settings to the given directory. Best-effort: failures
    /// are logged and the session continues.
    pub fn persist_to(&self, dir: &Path) {
        if let Err(e) = fs::create_dir_all(dir) {
            warn!(dir = %dir.display(), error = %e, "cannot create settings dir");
            return;
        }
        write_key(&dir.join(TEXT_SPEED_KEY), self.text_speed);
        write_key(&dir.join(VOLUME_KEY), self.volume);
    }
}

fn read_key(path: &Path) -> Option<f32> {
    let json = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt setting ignored");
            None
        }
    }
}

fn write_key(path: &Path, value: f32) {
    match serde_json::to_string(&value) {
        Ok(json) => {
            if let Err(e) = fs::write(path, json) {
                warn!(path = %path.display(), error = %e, "cannot persist setting");
            }
        }
        Err(e) => warn!(path = %path.display(), error = %e, "cannot serialize setting"),
    }
}
