//! The game controller state machine.

use tracing::{debug, error, warn};

use phosphor_audio::AudioDirector;
use phosphor_story::{Choice, StoryGraph, StoryNode};

use crate::error::{EngineError, EngineResult};
use crate::save::{SaveRecord, SaveStore};
use crate::scene::{ChoiceView, Scene, SceneKind};
use crate::state::PlayerState;

/// Orchestrates node transitions: applies stat deltas, persists saves, and
/// dispatches music cues, producing a [`Scene`] for the renderer after every
/// transition.
///
/// An explicit owned instance — construct one at startup and pass it where
/// it is needed.
pub struct GameController {
    graph: StoryGraph,
    state: PlayerState,
    current: Option<String>,
    save: Box<dyn SaveStore>,
    audio: AudioDirector,
}

impl GameController {
    /// Create a controller over a loaded graph.
    ///
    /// Integrity issues in the graph are logged for content authors here;
    /// at play time they degrade to the broken-path scene instead of
    /// crashing.
    pub fn new(graph: StoryGraph, save: Box<dyn SaveStore>, audio: AudioDirector) -> Self {
        for issue in graph.validate() {
            warn!(%issue, "story integrity");
        }
        Self {
            graph,
            state: PlayerState::new(),
            current: None,
            save,
            audio,
        }
    }

    /// The loaded story graph.
    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    /// Read-only view of the player state.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Key of the current node, if any.
    pub fn current_node(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The audio director, for the host to tick and adjust.
    pub fn audio_mut(&mut self) -> &mut AudioDirector {
        &mut self.audio
    }

    /// Begin a session: resume from a valid save, otherwise start fresh.
    pub fn start(&mut self) -> Scene {
        if let Some(record) = self.save.load() {
            if self.graph.contains(&record.current_node_key) {
                debug!(node = %record.current_node_key, "resuming saved game");
                self.state = record.player_state;
                self.current = Some(record.current_node_key.clone());
                // Resume presents the node as-is: its onLoad already applied
                // when the node first became current.
                let node = self.graph.get(&record.current_node_key).cloned();
                if let Some(node) = node {
                    self.dispatch_music(&node);
                    return self.scene_for(&record.current_node_key, &node);
                }
            }
            warn!(node = %record.current_node_key, "save points at unknown node, starting fresh");
            self.save.clear();
        }
        self.new_game()
    }

    /// Reset the player state to the authored initial stats and show the
    /// start node.
    pub fn new_game(&mut self) -> Scene {
        self.state = PlayerState::from_initial(&self.graph.initial_stats);
        self.current = None;
        let start = self.graph.start.clone();
        self.show_node(&start)
    }

    /// Discard the save and start over.
    pub fn restart(&mut self) -> Scene {
        debug!("restart requested");
        self.save.clear();
        self.new_game()
    }

    /// Take the choice at `index` in the eligible list of the current node.
    ///
    /// The first choice of a session also unlocks audio playback, since it
    /// proves a user gesture happened.
    pub fn make_choice(&mut self, index: usize) -> EngineResult<Scene> {
        self.audio.unlock();

        let current = self.current.as_deref().ok_or(EngineError::NoActiveNode)?;
        let node = self
            .graph
            .get(current)
            .cloned()
            .ok_or(EngineError::NoActiveNode)?;

        let choice = self
            .eligible_of(&node)
            .into_iter()
            .nth(index)
            .cloned()
            .ok_or(EngineError::InvalidChoice(index))?;

        // Choice deltas first, destination onLoad second; both must apply.
        self.state.apply(&choice.set_stats);
        let next = choice.next_node;
        Ok(self.show_node(&next))
    }

    /// A timed node's countdown expired: fall through to its timeout node.
    pub fn handle_timeout(&mut self) -> Scene {
        let target = self
            .current
            .as_deref()
            .and_then(|key| self.graph.get(key))
            .and_then(|node| node.timeout_node.clone());
        match target {
            Some(key) => {
                debug!(node = %key, "countdown expired");
                self.show_node(&key)
            }
            None => {
                error!("timeout fired on a node with no timeoutNode");
                self.broken_path()
            }
        }
    }

    /// Transition to a node by key.
    ///
    /// Fails softly: an unknown key produces the broken-path scene and
    /// leaves the session alive with only restart on offer.
    pub fn show_node(&mut self, key: &str) -> Scene {
        let Some(node) = self.graph.get(key).cloned() else {
            error!(node = key, "choice led to a missing node");
            return self.broken_path();
        };

        if let Some(on_load) = &node.on_load {
            self.state.apply(on_load);
        }
        self.current = Some(key.to_string());
        self.persist(key);
        self.dispatch_music(&node);
        self.scene_for(key, &node)
    }

    /// The requirement-filtered choices of the current node, authored order
    /// preserved.
    pub fn eligible_choices(&self) -> Vec<&Choice> {
        self.current
            .as_deref()
            .and_then(|key| self.graph.get(key))
            .map(|node| self.eligible_of(node))
            .unwrap_or_default()
    }

    fn eligible_of<'a>(&self, node: &'a StoryNode) -> Vec<&'a Choice> {
        node.choices
            .iter()
            .filter(|c| c.meets_requirements(|stat| self.state.get(stat)))
            .collect()
    }

    fn persist(&mut self, key: &str) {
        let record = SaveRecord {
            current_node_key: key.to_string(),
            player_state: self.state.clone(),
        };
        if let Err(e) = self.save.store(&record) {
            warn!(error = %e, "save failed, continuing without persistence");
        }
    }

    fn dispatch_music(&mut self, node: &StoryNode) {
        if let Some(cue) = node
            .presentation
            .as_ref()
            .and_then(|p| p.music.as_ref())
        {
            self.audio.request(cue.clone());
        }
    }

    fn scene_for(&self, key: &str, node: &StoryNode) -> Scene {
        let eligible = self.eligible_of(node);
        let countdown = eligible.iter().find_map(|c| c.timer);
        let choices = eligible
            .into_iter()
            .map(|c| ChoiceView {
                text: c.text.clone(),
                timer: c.timer,
            })
            .collect();

        Scene {
            kind: if node.is_terminal() {
                SceneKind::Ending
            } else {
                SceneKind::Node
            },
            node_key: Some(key.to_string()),
            text: node.text.clone(),
            stats: self.stat_readout(),
            choices,
            countdown,
            backdrop: node
                .presentation
                .as_ref()
                .and_then(|p| p.background.clone()),
            vfx: node.presentation.as_ref().and_then(|p| p.vfx.clone()),
            effects: node.effects.clone().unwrap_or_default(),
        }
    }

    fn broken_path(&mut self) -> Scene {
        self.current = None;
        Scene::broken_path(self.stat_readout())
    }

    fn stat_readout(&self) -> Vec<(String, phosphor_story::StatValue)> {
        self.state
            .readout()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }
}
