//! Story nodes and presentation directives.

use serde::{Deserialize, Serialize};

use crate::choice::Choice;
use crate::value::{StatBlock, StatValue};

/// The background asset for a node: an image or a video, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    /// Still image, referenced by an opaque identifier/URI.
    Image(String),
    /// Looping video, referenced by an opaque identifier/URI.
    Video(String),
}

impl Background {
    /// The asset identifier, regardless of kind.
    pub fn asset(&self) -> &str {
        match self {
            Background::Image(id) | Background::Video(id) => id,
        }
    }
}

/// A background-music directive.
///
/// Authored as a plain track identifier, with the reserved string
/// `"fadeout"` meaning "stop with fade, start nothing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MusicCue {
    /// Crossfade to the named track.
    Track(String),
    /// Fade the current track out and stop.
    FadeOut,
}

/// Reserved sentinel for [`MusicCue::FadeOut`].
pub const FADEOUT_SENTINEL: &str = "fadeout";

impl From<String> for MusicCue {
    fn from(s: String) -> Self {
        if s == FADEOUT_SENTINEL {
            MusicCue::FadeOut
        } else {
            MusicCue::Track(s)
        }
    }
}

impl From<MusicCue> for String {
    fn from(cue: MusicCue) -> Self {
        match cue {
            MusicCue::Track(id) => id,
            MusicCue::FadeOut => FADEOUT_SENTINEL.to_string(),
        }
    }
}

/// Presentation directives applied when a node becomes current.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// Background asset to crossfade to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    /// Background-music directive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<MusicCue>,
    /// Named visual-effect tag, interpreted by the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vfx: Option<String>,
}

/// Transient, non-persistent cues fired once when a node is shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effects {
    /// Pulse the glitch overlay.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub glitch: bool,
    /// One-shot sound cue identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

/// One narrative beat: text, optional directives, and outgoing choices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryNode {
    /// Narrative text, rendered verbatim.
    pub text: String,
    /// Presentation directives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<Presentation>,
    /// Stat deltas applied once, when the node becomes current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_load: Option<StatBlock>,
    /// Transient cues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Effects>,
    /// Destination if a timed choice expires unanswered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_node: Option<String>,
    /// Outgoing choices, in authored order. Empty marks an ending.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
}

impl StoryNode {
    /// Create a node with the given narrative text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the presentation directives.
    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = Some(presentation);
        self
    }

    /// Add an `onLoad` stat delta.
    pub fn with_on_load(mut self, stat: impl Into<String>, value: impl Into<StatValue>) -> Self {
        self.on_load
            .get_or_insert_with(StatBlock::new)
            .insert(stat.into(), value.into());
        self
    }

    /// Set the transient effects.
    pub fn with_effects(mut self, effects: Effects) -> Self {
        self.effects = Some(effects);
        self
    }

    /// Set the timeout destination.
    pub fn with_timeout_node(mut self, key: impl Into<String>) -> Self {
        self.timeout_node = Some(key.into());
        self
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Whether this node is an ending.
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    /// The node's countdown in seconds: the first timer carried by any
    /// choice, if one exists.
    pub fn timer(&self) -> Option<f32> {
        self.choices.iter().find_map(|c| c.timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn music_cue_sentinel() {
        let cue: MusicCue = serde_json::from_str(r#""fadeout""#).unwrap();
        assert_eq!(cue, MusicCue::FadeOut);

        let cue: MusicCue = serde_json::from_str(r#""drone-loop""#).unwrap();
        assert_eq!(cue, MusicCue::Track("drone-loop".to_string()));

        let json = serde_json::to_string(&MusicCue::FadeOut).unwrap();
        assert_eq!(json, r#""fadeout""#);
    }

    #[test]
    fn background_authoring_shape() {
        let bg: Background = serde_json::from_str(r#"{"image":"crt-room.png"}"#).unwrap();
        assert_eq!(bg, Background::Image("crt-room.png".to_string()));
        assert_eq!(bg.asset(), "crt-room.png");

        let bg: Background = serde_json::from_str(r#"{"video":"static.webm"}"#).unwrap();
        assert_eq!(bg, Background::Video("static.webm".to_string()));
    }

    #[test]
    fn node_timer_comes_from_choices() {
        let node = StoryNode::new("The system is unstable.")
            .with_choice(Choice::new("Debug it.", "debug").with_timer(15.0))
            .with_choice(Choice::new("Force execution.", "force_execute"));
        assert_eq!(node.timer(), Some(15.0));

        let node = StoryNode::new("All quiet.").with_choice(Choice::new("Wait.", "wait"));
        assert_eq!(node.timer(), None);
    }

    #[test]
    fn terminal_node_has_no_choices() {
        assert!(StoryNode::new("THE END").is_terminal());
        assert!(
            !StoryNode::new("...")
                .with_choice(Choice::new("Go on.", "next"))
                .is_terminal()
        );
    }

    #[test]
    fn node_round_trip() {
        let node = StoryNode::new("You force the execution.")
            .with_on_load("sanity", -20.0)
            .with_effects(Effects {
                glitch: true,
                sound: Some("sfx-glitch".to_string()),
            })
            .with_choice(Choice::new("Restart the terminal.", "obey"));

        let json = serde_json::to_string(&node).unwrap();
        let back: StoryNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
