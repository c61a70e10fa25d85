//! Game controller, player state, and persistence for Phosphor.
//!
//! The [`GameController`] owns the loaded [`phosphor_story::StoryGraph`], the
//! mutable [`PlayerState`], and the current node key. Every transition
//! returns a read-only [`Scene`] snapshot for a presentation layer to
//! display; the renderer never mutates game state directly. Saves and user
//! settings are best-effort JSON files — a missing or corrupt save is a
//! fresh game, never a crash.

/// The game controller state machine.
pub mod controller;
/// Error types for the engine.
pub mod error;
/// Save records and save stores.
pub mod save;
/// The scene view model handed to renderers.
pub mod scene;
/// User settings, independent of story state.
pub mod settings;
/// The player state store.
pub mod state;

pub use controller::GameController;
pub use error::{EngineError, EngineResult};
pub use save::{FileStore, MemoryStore, SaveError, SaveRecord, SaveStore};
pub use scene::{ChoiceView, Scene, SceneKind};
pub use settings::Settings;
pub use state::PlayerState;
