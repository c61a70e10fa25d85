//! The crossfade state machine.

use phosphor_story::MusicCue;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::AudioResult;

/// Duration of each half of a crossfade, in seconds.
pub const FADE_SECS: f32 = 1.5;

/// Default background-music volume.
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Fade progress for the active track.
#[derive(Debug, Clone, PartialEq)]
enum Fade {
    /// Steady state: the current track (if any) plays at full volume.
    Idle,
    /// The outgoing track is fading to silence; `then` starts afterwards.
    Out {
        /// Seconds left in the fade.
        remaining: f32,
        /// Track to fade in next, or `None` to stop.
        then: Option<String>,
    },
    /// The incoming track is fading up to the configured volume.
    In {
        /// Seconds left in the fade.
        remaining: f32,
    },
}

/// Manages the single background track: unlock gate, request queue, linear
/// crossfade, one-shot cues, and volume.
///
/// Drive it from the host's frame loop with [`AudioDirector::tick`].
pub struct AudioDirector {
    backend: Box<dyn Backend>,
    unlocked: bool,
    queued: Option<MusicCue>,
    current: Option<String>,
    volume: f32,
    fade: Fade,
}

impl AudioDirector {
    /// Create a director over the given backend, locked, at the default
    /// volume.
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            unlocked: false,
            queued: None,
            current: None,
            volume: DEFAULT_VOLUME,
            fade: Fade::Idle,
        }
    }

    /// Whether the one-time unlock has happened.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// The track currently attached to the backend, if any.
    pub fn current_track(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The configured volume.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the volume, clamped to 0.0–1.0 and applied immediately.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if self.fade == Fade::Idle && self.current.is_some() {
            self.backend.set_gain(self.volume);
        }
    }

    /// Mark the engine unlocked and flush any queued request. Idempotent.
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        debug!("audio unlocked");
        if let Some(cue) = self.queued.take() {
            self.request(cue);
        }
    }

    /// Request a music change.
    ///
    /// While locked, the request is queued and only the most recent one is
    /// retained. Requesting the track that is already playing (or fading in)
    /// is a no-op.
    pub fn request(&mut self, cue: MusicCue) {
        if !self.unlocked {
            self.queued = Some(cue);
            return;
        }

        let target = match cue {
            MusicCue::Track(track) => Some(track),
            MusicCue::FadeOut => None,
        };

        // Idempotent if we are already at (or heading toward) the target.
        let heading_to = match &self.fade {
            Fade::Out { then, .. } => then.as_deref(),
            _ => self.current.as_deref(),
        };
        if heading_to == target.as_deref() {
            return;
        }

        if self.current.is_some() {
            self.fade = Fade::Out {
                remaining: FADE_SECS,
                then: target,
            };
        } else if let Some(track) = target {
            self.begin_track(track);
        }
    }

    /// Fire a one-shot sound cue. Dropped while locked.
    pub fn play_cue(&mut self, cue: &str) {
        if !self.unlocked {
            debug!(cue, "dropping sound cue before unlock");
            return;
        }
        if let Err(e) = self.backend.start_cue(cue) {
            warn!(cue, error = %e, "sound cue failed");
        }
    }

    /// Advance fades by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        match std::mem::replace(&mut self.fade, Fade::Idle) {
            Fade::Idle => {}
            Fade::Out { remaining, then } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.backend.stop();
                    self.current = None;
                    if let Some(track) = then {
                        self.begin_track(track);
                    }
                } else {
                    self.backend
                        .set_gain(self.volume * (remaining / FADE_SECS).clamp(0.0, 1.0));
                    self.fade = Fade::Out { remaining, then };
                }
            }
            Fade::In { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.backend.set_gain(self.volume);
                } else {
                    self.backend
                        .set_gain(self.volume * (1.0 - remaining / FADE_SECS).clamp(0.0, 1.0));
                    self.fade = Fade::In { remaining };
                }
            }
        }
    }

    /// Start a track from silence and begin fading it in. Start failures are
    /// logged and leave the director idle and silent.
    fn begin_track(&mut self, track: String) {
        match self.try_start(&track) {
            Ok(()) => {
                self.current = Some(track);
                self.fade = Fade::In {
                    remaining: FADE_SECS,
                };
            }
            Err(e) => {
                warn!(track, error = %e, "music start failed, continuing silent");
                self.current = None;
                self.fade = Fade::Idle;
            }
        }
    }

    fn try_start(&mut self, track: &str) -> AudioResult<()> {
        self.backend.start(track)?;
        self.backend.set_gain(0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::AudioError;

    /// What the backend was told to do, for assertions.
    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Start(String),
        Cue(String),
        Stop,
        Gain(f32),
    }

    #[derive(Default)]
    struct Recording {
        events: Rc<RefCell<Vec<Event>>>,
        fail_start: bool,
    }

    impl Backend for Recording {
        fn start(&mut self, track: &str) -> AudioResult<()> {
            if self.fail_start {
                return Err(AudioError::Unavailable("blocked".into()));
            }
            self.events.borrow_mut().push(Event::Start(track.into()));
            Ok(())
        }

        fn start_cue(&mut self, cue: &str) -> AudioResult<()> {
            self.events.borrow_mut().push(Event::Cue(cue.into()));
            Ok(())
        }

        fn stop(&mut self) {
            self.events.borrow_mut().push(Event::Stop);
        }

        fn set_gain(&mut self, gain: f32) {
            self.events.borrow_mut().push(Event::Gain(gain));
        }
    }

    fn recording_director() -> (AudioDirector, Rc<RefCell<Vec<Event>>>) {
        let backend = Recording::default();
        let log = Rc::clone(&backend.events);
        (AudioDirector::new(Box::new(backend)), log)
    }

    #[test]
    fn locked_requests_queue_latest_only() {
        let (mut director, log) = recording_director();
        director.request(MusicCue::Track("first".into()));
        director.request(MusicCue::Track("second".into()));
        assert!(log.borrow().is_empty());

        director.unlock();
        assert_eq!(director.current_track(), Some("second"));
        assert_eq!(log.borrow()[0], Event::Start("second".into()));
    }

    #[test]
    fn unlock_is_idempotent() {
        let (mut director, log) = recording_director();
        director.request(MusicCue::Track("theme".into()));
        director.unlock();
        let after_first = log.borrow().len();
        director.unlock();
        assert_eq!(log.borrow().len(), after_first);
        assert!(director.is_unlocked());
    }

    #[test]
    fn crossfade_fades_out_then_in() {
        let (mut director, log) = recording_director();
        director.unlock();
        director.request(MusicCue::Track("a".into()));
        // Finish the fade-in.
        director.tick(FADE_SECS + 0.1);
        log.borrow_mut().clear();

        director.request(MusicCue::Track("b".into()));
        // Halfway out: gain should be falling, "b" not started yet.
        director.tick(FADE_SECS / 2.0);
        {
            let events = log.borrow();
            assert!(matches!(events[0], Event::Gain(g) if g < director.volume()));
            assert!(!events.contains(&Event::Start("b".into())));
        }

        // Completing the fade-out stops "a" and starts "b" from silence.
        director.tick(FADE_SECS / 2.0 + 0.01);
        {
            let events = log.borrow();
            let stop_at = events.iter().position(|e| *e == Event::Stop).unwrap();
            let start_at = events
                .iter()
                .position(|e| *e == Event::Start("b".into()))
                .unwrap();
            assert!(stop_at < start_at);
        }
        assert_eq!(director.current_track(), Some("b"));

        // And the new track fades up to full volume.
        director.tick(FADE_SECS + 0.1);
        assert_eq!(*log.borrow().last().unwrap(), Event::Gain(director.volume()));
    }

    #[test]
    fn fadeout_sentinel_stops_without_restarting() {
        let (mut director, log) = recording_director();
        director.unlock();
        director.request(MusicCue::Track("a".into()));
        director.tick(FADE_SECS + 0.1);
        log.borrow_mut().clear();

        director.request(MusicCue::FadeOut);
        director.tick(FADE_SECS + 0.1);
        assert_eq!(director.current_track(), None);
        let events = log.borrow();
        assert!(events.contains(&Event::Stop));
        assert!(!events.iter().any(|e| matches!(e, Event::Start(t) if t == "a")));
    }

    #[test]
    fn requesting_the_playing_track_is_a_no_op() {
        let (mut director, log) = recording_director();
        director.unlock();
        director.request(MusicCue::Track("a".into()));
        director.tick(FADE_SECS + 0.1);
        let before = log.borrow().len();

        director.request(MusicCue::Track("a".into()));
        director.tick(1.0);
        assert_eq!(log.borrow().len(), before);
    }

    #[test]
    fn start_failure_leaves_game_silent_not_broken() {
        let backend = Recording {
            fail_start: true,
            ..Recording::default()
        };
        let mut director = AudioDirector::new(Box::new(backend));
        director.unlock();
        director.request(MusicCue::Track("theme".into()));
        assert_eq!(director.current_track(), None);

        // Still usable afterwards.
        director.tick(1.0);
        director.set_volume(0.5);
        assert_eq!(director.volume(), 0.5);
    }

    #[test]
    fn volume_is_clamped() {
        let (mut director, _log) = recording_director();
        director.set_volume(7.0);
        assert_eq!(director.volume(), 1.0);
        director.set_volume(-1.0);
        assert_eq!(director.volume(), 0.0);
    }

    #[test]
    fn cues_drop_before_unlock_and_fire_after() {
        let (mut director, log) = recording_director();
        director.play_cue("sfx-tension");
        assert!(log.borrow().is_empty());

        director.unlock();
        director.play_cue("sfx-tension");
        assert_eq!(*log.borrow().last().unwrap(), Event::Cue("sfx-tension".into()));
    }
}
