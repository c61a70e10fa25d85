//! The per-node render cycle.
//!
//! One `RenderCycle` exists per presented scene. It owns every in-flight
//! animation handle: the typewriter position, the staggered entrance of the
//! choice list, the countdown, the glitch pulse, and the post-timeout input
//! lock. Starting the next scene replaces the whole struct, which cancels
//! all of them — a superseded countdown can never fire.

use phosphor_engine::{Scene, Settings};

/// Seconds between staggered choice entrances.
const STAGGER_SECS: f32 = 0.15;

/// Duration of the glitch pulse.
const GLITCH_SECS: f32 = 0.7;

/// Input stays locked this long after a countdown expires, before the
/// timeout transition is taken.
const TIMEOUT_LOCK_SECS: f32 = 0.6;

/// Where a cycle is in its presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Text is being revealed character by character.
    Revealing,
    /// Full text shown; choices (or the restart affordance) are live.
    ChoicesVisible,
    /// Input is dead: a countdown expired and the timeout transition is
    /// pending, or a choice was just taken.
    Locked,
}

/// Emitted by [`RenderCycle::tick`] when the cycle needs the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEvent {
    /// The reveal finished; the scene is fully presented. Fired exactly
    /// once per cycle, on every path including endings and the broken path.
    Ready,
    /// The post-timeout lock elapsed; take the timeout transition now.
    TimeoutElapsed,
}

/// Presentation state for a single scene.
#[derive(Debug, Clone)]
pub struct RenderCycle {
    text_len: usize,
    revealed: usize,
    reveal_accum: f32,
    phase: Phase,
    ready_fired: bool,
    restart_only: bool,
    choice_count: usize,
    stagger_elapsed: f32,
    countdown_total: Option<f32>,
    countdown_remaining: Option<f32>,
    lock_remaining: f32,
    glitch_remaining: f32,
    selected: usize,
}

impl RenderCycle {
    /// Begin presenting a scene.
    pub fn new(scene: &Scene) -> Self {
        Self {
            text_len: scene.text.chars().count(),
            revealed: 0,
            reveal_accum: 0.0,
            phase: Phase::Revealing,
            ready_fired: false,
            restart_only: scene.restart_only(),
            choice_count: scene.choices.len(),
            stagger_elapsed: 0.0,
            countdown_total: scene.countdown,
            countdown_remaining: None,
            lock_remaining: 0.0,
            glitch_remaining: if scene.effects.glitch { GLITCH_SECS } else { 0.0 },
            selected: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of characters of the text currently revealed.
    pub fn revealed_chars(&self) -> usize {
        self.revealed
    }

    /// Whether the glitch pulse is active this frame.
    pub fn glitching(&self) -> bool {
        self.glitch_remaining > 0.0
    }

    /// Choices that have finished their entrance stagger.
    pub fn visible_choices(&self) -> usize {
        if self.phase == Phase::Revealing {
            return 0;
        }
        let by_stagger = (self.stagger_elapsed / STAGGER_SECS) as usize + 1;
        by_stagger.min(self.choice_count)
    }

    /// The countdown still running, as `(remaining, total)`.
    pub fn countdown(&self) -> Option<(f32, f32)> {
        match (self.countdown_remaining, self.countdown_total) {
            (Some(remaining), Some(total)) => Some((remaining, total)),
            _ => None,
        }
    }

    /// Index of the highlighted choice.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the highlight. No-op unless choices are live.
    pub fn select(&mut self, delta: isize) {
        if self.phase != Phase::ChoicesVisible || self.choice_count == 0 {
            return;
        }
        let count = self.choice_count as isize;
        let next = (self.selected as isize + delta).rem_euclid(count);
        self.selected = next as usize;
    }

    /// Whether input can activate a choice right now.
    pub fn accepts_choices(&self) -> bool {
        self.phase == Phase::ChoicesVisible && !self.restart_only
    }

    /// Whether the restart affordance is live.
    pub fn accepts_restart(&self) -> bool {
        self.phase == Phase::ChoicesVisible && self.restart_only
    }

    /// Skip the typewriter, revealing the full text immediately.
    pub fn skip_reveal(&mut self) {
        if self.phase == Phase::Revealing {
            self.revealed = self.text_len;
        }
    }

    /// Kill all input for this cycle (a choice was just activated).
    pub fn lock(&mut self) {
        self.phase = Phase::Locked;
        self.countdown_remaining = None;
    }

    /// Advance animations by `dt` seconds.
    pub fn tick(&mut self, dt: f32, settings: &Settings) -> Option<CycleEvent> {
        if self.glitch_remaining > 0.0 {
            self.glitch_remaining -= dt;
        }

        match self.phase {
            Phase::Revealing => {
                self.reveal_accum += dt / settings.char_delay();
                let step = self.reveal_accum as usize;
                if step > 0 {
                    self.reveal_accum -= step as f32;
                    self.revealed = (self.revealed + step).min(self.text_len);
                }
                if self.revealed >= self.text_len {
                    self.phase = Phase::ChoicesVisible;
                    self.countdown_remaining = self.countdown_total;
                    if !self.ready_fired {
                        self.ready_fired = true;
                        return Some(CycleEvent::Ready);
                    }
                }
                None
            }
            Phase::ChoicesVisible => {
                self.stagger_elapsed += dt;
                if let Some(remaining) = self.countdown_remaining.as_mut() {
                    *remaining -= dt;
                    if *remaining <= 0.0 {
                        self.countdown_remaining = None;
                        self.phase = Phase::Locked;
                        self.lock_remaining = TIMEOUT_LOCK_SECS;
                    }
                }
                None
            }
            Phase::Locked => {
                if self.lock_remaining > 0.0 {
                    self.lock_remaining -= dt;
                    if self.lock_remaining <= 0.0 {
                        return Some(CycleEvent::TimeoutElapsed);
                    }
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phosphor_engine::{ChoiceView, SceneKind};
    use phosphor_story::Effects;

    fn scene(text: &str, choices: usize, countdown: Option<f32>) -> Scene {
        Scene {
            kind: if choices == 0 {
                SceneKind::Ending
            } else {
                SceneKind::Node
            },
            node_key: Some("node".to_string()),
            text: text.to_string(),
            stats: Vec::new(),
            choices: (0..choices)
                .map(|i| ChoiceView {
                    text: format!("choice {i}"),
                    timer: countdown,
                })
                .collect(),
            countdown,
            backdrop: None,
            vfx: None,
            effects: Effects::default(),
        }
    }

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn reveal_progresses_at_settings_speed() {
        let mut cycle = RenderCycle::new(&scene("abcdefghij", 1, None));
        // 50 chars/sec: 0.1s reveals 5 characters.
        cycle.tick(0.1, &settings());
        assert_eq!(cycle.revealed_chars(), 5);
        assert_eq!(cycle.phase(), Phase::Revealing);
    }

    #[test]
    fn ready_fires_exactly_once_when_reveal_completes() {
        let mut cycle = RenderCycle::new(&scene("abc", 1, None));
        assert_eq!(cycle.tick(1.0, &settings()), Some(CycleEvent::Ready));
        assert_eq!(cycle.phase(), Phase::ChoicesVisible);
        assert_eq!(cycle.tick(1.0, &settings()), None);
    }

    #[test]
    fn ready_fires_for_endings_too() {
        let mut cycle = RenderCycle::new(&scene("THE END", 0, None));
        assert_eq!(cycle.tick(1.0, &settings()), Some(CycleEvent::Ready));
        assert!(cycle.accepts_restart());
        assert!(!cycle.accepts_choices());
    }

    #[test]
    fn skip_reveals_everything() {
        let mut cycle = RenderCycle::new(&scene("a very long paragraph of text", 1, None));
        cycle.skip_reveal();
        cycle.tick(0.001, &settings());
        assert_eq!(cycle.phase(), Phase::ChoicesVisible);
    }

    #[test]
    fn countdown_starts_after_reveal_and_expires_into_lock() {
        let mut cycle = RenderCycle::new(&scene("abc", 2, Some(15.0)));
        cycle.tick(1.0, &settings());
        assert!(cycle.countdown().is_some());

        // 14 seconds in, still counting.
        cycle.tick(14.0, &settings());
        let (remaining, total) = cycle.countdown().unwrap();
        assert_eq!(total, 15.0);
        assert!(remaining > 0.0);

        // Expiry locks input, and the timeout event fires after the lock.
        assert_eq!(cycle.tick(1.5, &settings()), None);
        assert_eq!(cycle.phase(), Phase::Locked);
        assert!(!cycle.accepts_choices());
        assert_eq!(cycle.tick(1.0, &settings()), Some(CycleEvent::TimeoutElapsed));
    }

    #[test]
    fn locking_cancels_the_countdown() {
        let mut cycle = RenderCycle::new(&scene("abc", 2, Some(15.0)));
        cycle.tick(1.0, &settings());
        cycle.lock();
        assert!(cycle.countdown().is_none());
        // No timeout ever fires from a locked-by-choice cycle.
        assert_eq!(cycle.tick(60.0, &settings()), None);
    }

    #[test]
    fn choices_stagger_in() {
        let mut cycle = RenderCycle::new(&scene("a", 3, None));
        cycle.tick(0.05, &settings());
        assert_eq!(cycle.phase(), Phase::ChoicesVisible);
        assert_eq!(cycle.visible_choices(), 1);
        cycle.tick(STAGGER_SECS, &settings());
        assert_eq!(cycle.visible_choices(), 2);
        cycle.tick(10.0, &settings());
        assert_eq!(cycle.visible_choices(), 3);
    }

    #[test]
    fn selection_wraps() {
        let mut cycle = RenderCycle::new(&scene("a", 3, None));
        cycle.tick(1.0, &settings());
        cycle.select(-1);
        assert_eq!(cycle.selected(), 2);
        cycle.select(1);
        assert_eq!(cycle.selected(), 0);
    }

    #[test]
    fn glitch_pulse_decays() {
        let mut glitchy = scene("a", 1, None);
        glitchy.effects.glitch = true;
        let mut cycle = RenderCycle::new(&glitchy);
        assert!(cycle.glitching());
        cycle.tick(1.0, &settings());
        assert!(!cycle.glitching());
    }
}
