//! The scene view model handed to renderers.

use phosphor_story::{Background, Effects, StatValue};

/// The fixed in-fiction message shown when a choice leads nowhere.
pub const BROKEN_PATH_TEXT: &str = "The screen fills with dead pixels. Whatever was supposed to \
     be on the other side of that choice was never written. > PATH NOT FOUND. RESTART?";

/// What kind of beat a scene presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// A regular story node.
    Node,
    /// A node with no outgoing choices: an ending.
    Ending,
    /// A dangling reference was followed; only restart is offered.
    BrokenPath,
}

/// One eligible choice, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceView {
    /// The choice text.
    pub text: String,
    /// This choice's countdown, if it is timed.
    pub timer: Option<f32>,
}

/// A read-only snapshot of everything a renderer needs to present one node.
///
/// `text` is always the complete narrative text: progressive reveal is a
/// renderer animation, and assistive consumers get the full text from the
/// first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// What kind of beat this is.
    pub kind: SceneKind,
    /// Key of the presented node (`None` for the broken path).
    pub node_key: Option<String>,
    /// Complete narrative text.
    pub text: String,
    /// Stat readout entries, unset/false flags already skipped.
    pub stats: Vec<(String, StatValue)>,
    /// The requirement-filtered choices, in authored order.
    pub choices: Vec<ChoiceView>,
    /// Countdown in seconds, when any offered choice is timed.
    pub countdown: Option<f32>,
    /// Background asset to crossfade to, if the node changes it.
    pub backdrop: Option<Background>,
    /// Named visual-effect tag.
    pub vfx: Option<String>,
    /// Transient cues to fire once when presentation starts.
    pub effects: Effects,
}

impl Scene {
    /// Whether the renderer should offer only the restart affordance.
    pub fn restart_only(&self) -> bool {
        matches!(self.kind, SceneKind::Ending | SceneKind::BrokenPath)
    }

    /// The fixed broken-path scene: no choices, restart only.
    pub fn broken_path(stats: Vec<(String, StatValue)>) -> Self {
        Self {
            kind: SceneKind::BrokenPath,
            node_key: None,
            text: BROKEN_PATH_TEXT.to_string(),
            stats,
            choices: Vec::new(),
            countdown: None,
            backdrop: None,
            vfx: None,
            effects: Effects {
                glitch: true,
                sound: None,
            },
        }
    }
}
