//! Application state and input handling.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use phosphor_engine::{GameController, Scene, Settings};
use phosphor_story::Background;

use crate::cycle::{CycleEvent, RenderCycle};

/// Seconds for the backdrop crossfade.
const BACKDROP_FADE_SECS: f32 = 1.0;

/// Volume step per keypress.
const VOLUME_STEP: f32 = 0.1;

/// Text-speed factor per keypress.
const SPEED_FACTOR: f32 = 1.25;

/// Crossfade state for the background asset pane.
#[derive(Debug, Clone, Default)]
pub struct BackdropFade {
    /// Asset fading out, discarded once the fade completes.
    pub outgoing: Option<Background>,
    /// Asset fading in (or fully shown).
    pub current: Option<Background>,
    /// Fade-in progress, 0.0–1.0.
    pub alpha: f32,
}

impl BackdropFade {
    fn swap_to(&mut self, next: Option<Background>) {
        if next == self.current {
            return;
        }
        self.outgoing = self.current.take();
        self.current = next;
        self.alpha = 0.0;
    }

    fn tick(&mut self, dt: f32) {
        if self.alpha < 1.0 {
            self.alpha = (self.alpha + dt / BACKDROP_FADE_SECS).min(1.0);
            if self.alpha >= 1.0 {
                // Old asset is gone for good.
                self.outgoing = None;
            }
        }
    }
}

/// Top-level application state: the controller, the active render cycle,
/// and the player's settings.
pub struct App {
    controller: GameController,
    settings: Settings,
    settings_dir: Option<PathBuf>,
    scene: Scene,
    cycle: RenderCycle,
    backdrop: BackdropFade,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create the app and present the opening scene (resumed or fresh).
    pub fn new(
        mut controller: GameController,
        settings: Settings,
        settings_dir: Option<PathBuf>,
    ) -> Self {
        controller.audio_mut().set_volume(settings.volume);
        let scene = controller.start();
        let cycle = RenderCycle::new(&scene);
        let mut app = Self {
            controller,
            settings,
            settings_dir,
            scene,
            cycle,
            backdrop: BackdropFade::default(),
            should_quit: false,
        };
        app.apply_scene_side_effects();
        app
    }

    /// The scene being presented. Its `text` is always complete,
    /// independent of the typewriter position.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The active render cycle.
    pub fn cycle(&self) -> &RenderCycle {
        &self.cycle
    }

    /// The backdrop crossfade state.
    pub fn backdrop(&self) -> &BackdropFade {
        &self.backdrop
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The engine behind the app.
    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    /// Advance all animations and the audio director by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.backdrop.tick(dt);
        self.controller.audio_mut().tick(dt);
        match self.cycle.tick(dt, &self.settings) {
            Some(CycleEvent::Ready) => {
                debug!(node = ?self.scene.node_key, "scene fully presented");
            }
            Some(CycleEvent::TimeoutElapsed) => {
                let scene = self.controller.handle_timeout();
                self.present(scene);
            }
            None => {}
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Up | KeyCode::Char('k') => self.cycle.select(-1),
            KeyCode::Down | KeyCode::Char('j') => self.cycle.select(1),
            KeyCode::Char('r') => {
                if self.cycle.accepts_restart() {
                    let scene = self.controller.restart();
                    self.present(scene);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_volume(VOLUME_STEP),
            KeyCode::Char('-') => self.adjust_volume(-VOLUME_STEP),
            KeyCode::Char(']') => self.adjust_speed(SPEED_FACTOR),
            KeyCode::Char('[') => self.adjust_speed(1.0 / SPEED_FACTOR),
            _ => {}
        }
    }

    /// Enter/space: skip the reveal, take the highlighted choice, or
    /// restart at an ending.
    fn activate(&mut self) {
        if self.cycle.accepts_restart() {
            let scene = self.controller.restart();
            self.present(scene);
            return;
        }
        if !self.cycle.accepts_choices() {
            self.cycle.skip_reveal();
            return;
        }
        let index = self.cycle.selected();
        // Dead to further input before the controller runs: no double
        // submission, no race with the countdown.
        self.cycle.lock();
        match self.controller.make_choice(index) {
            Ok(scene) => self.present(scene),
            Err(e) => {
                // Refused choices (stale input) leave the cycle locked;
                // the next scene will replace it.
                debug!(error = %e, "choice refused");
            }
        }
    }

    /// Replace the current cycle with a new one for `scene`.
    ///
    /// This is the cancellation point: every timer of the previous cycle
    /// dies here, before any new one starts.
    fn present(&mut self, scene: Scene) {
        self.scene = scene;
        self.cycle = RenderCycle::new(&self.scene);
        self.apply_scene_side_effects();
    }

    fn apply_scene_side_effects(&mut self) {
        // An absent directive keeps the current backdrop; only an explicit
        // one swaps it.
        if self.scene.backdrop.is_some() {
            self.backdrop.swap_to(self.scene.backdrop.clone());
        }
        if let Some(sound) = self.scene.effects.sound.clone() {
            self.controller.audio_mut().play_cue(&sound);
        }
    }

    fn adjust_volume(&mut self, delta: f32) {
        self.settings.step_volume(delta);
        self.controller.audio_mut().set_volume(self.settings.volume);
        self.persist_settings();
    }

    fn adjust_speed(&mut self, factor: f32) {
        self.settings.step_text_speed(factor);
        self.persist_settings();
    }

    fn persist_settings(&mut self) {
        if let Some(dir) = &self.settings_dir {
            self.settings.persist_to(dir);
        }
    }
}
