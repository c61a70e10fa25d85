//! A built-in demo story.
//!
//! A short CRT-horror narrative used as the default graph and as the
//! reference exercise of the authoring API: gated choices, a timed decision
//! with a fall-through, stat deltas on both choices and nodes, transient
//! effects, and several endings.

use crate::choice::{Choice, Requirement};
use crate::graph::StoryGraph;
use crate::node::{Background, Effects, MusicCue, Presentation, StoryNode};

/// Build the demo story graph. Always validates clean.
pub fn demo_story() -> StoryGraph {
    StoryGraph::new("start")
        .with_initial_stat("sanity", 100.0)
        .with_initial_stat("suspicion", 0.0)
        .with_initial_stat("knowledge", 0.0)
        .with_node(
            "start",
            StoryNode::new(
                "The low hum of a CRT fills the silence. You are in a windowless room. \
                 The monitor in front of you blinks: > WAKE UP.",
            )
            .with_presentation(Presentation {
                background: Some(Background::Image("crt-room".to_string())),
                music: Some(MusicCue::Track("drone-loop".to_string())),
                vfx: Some("scanlines".to_string()),
            })
            .with_choice(Choice::new("Obey.", "obey"))
            .with_choice(Choice::new("Ignore it and examine the room.", "examine_room")),
        )
        .with_node(
            "examine_room",
            StoryNode::new(
                "The walls are smooth, cold concrete. There are no doors. The only way \
                 out seems to be through the screen. The monitor now reads: \
                 > THERE IS NO ESCAPE. ONLY CHOICES.",
            )
            .with_on_load("suspicion", 10.0)
            .with_choice(Choice::new("Turn back to the monitor.", "obey")),
        )
        .with_node(
            "obey",
            StoryNode::new(
                "You focus on the screen. The text changes. > The system is unstable. \
                 An anomaly has been detected. Begin debugging, or force execution?",
            )
            .with_effects(Effects {
                glitch: false,
                sound: Some("sfx-tension".to_string()),
            })
            .with_timeout_node("hesitation")
            .with_choice(Choice::new("Begin debugging.", "debug").with_timer(15.0))
            .with_choice(Choice::new("Force execution.", "force_execute").with_timer(15.0)),
        )
        .with_node(
            "hesitation",
            StoryNode::new(
                "You hesitate too long. The prompt times out and the screen floods \
                 with static. When it clears, the question is gone. The anomaly chose \
                 for you.",
            )
            .with_on_load("sanity", -10.0)
            .with_effects(Effects {
                glitch: true,
                sound: Some("sfx-glitch".to_string()),
            })
            .with_choice(Choice::new("Face what it did.", "force_execute")),
        )
        .with_node(
            "debug",
            StoryNode::new(
                "You enter debug mode. Lines of code stream past, most of them \
                 indecipherable, but one variable catches your eye: 'userSanity'. \
                 Its current value is 100.",
            )
            .with_on_load("knowledge", 1.0)
            .with_choice(Choice::new("Set the value to 0.", "sanity_zero"))
            .with_choice(Choice::new("Exit the debugger.", "debug_exit")),
        )
        .with_node(
            "force_execute",
            StoryNode::new(
                "You force the execution. The screen cracks into a mosaic of dead \
                 pixels. A shrill tone fills the room and your head aches. Reality \
                 feels... thin.",
            )
            .with_on_load("sanity", -20.0)
            .with_presentation(Presentation {
                background: Some(Background::Video("static".to_string())),
                music: Some(MusicCue::Track("anomaly-theme".to_string())),
                vfx: None,
            })
            .with_effects(Effects {
                glitch: true,
                sound: Some("sfx-glitch".to_string()),
            })
            .with_choice(Choice::new("Reboot the terminal.", "obey"))
            .with_choice(Choice::new("Try to smash the monitor.", "break_monitor"))
            .with_choice(
                // Only offered once the static has already taken a bite.
                Choice::new("Accept the static as your new reality.", "embrace_static")
                    .with_requirement("sanity", Requirement::LessThan { less_than: 85.0 }),
            ),
        )
        .with_node(
            "break_monitor",
            StoryNode::new(
                "You strike the screen with everything you have. It does not break. \
                 Instead your hand passes through it like water. The cold static \
                 climbs your arm, consuming you.",
            )
            .with_on_load("sanity", -50.0)
            .with_presentation(Presentation {
                background: None,
                music: Some(MusicCue::FadeOut),
                vfx: None,
            })
            .with_effects(Effects {
                glitch: true,
                sound: Some("sfx-long-glitch".to_string()),
            }),
            // Ending: consumed.
        )
        .with_node(
            "embrace_static",
            StoryNode::new(
                "You relax and stare into the static. The headache fades. In the \
                 white noise you begin to see patterns, truths, a code underlying \
                 the universe. You no longer need a body.",
            )
            .with_on_load("sanity", -100.0)
            .with_on_load("knowledge", 10.0),
            // Ending: illuminated.
        )
        .with_node(
            "sanity_zero",
            StoryNode::new(
                "You set the value to 0 and press Enter. The room disappears. You \
                 are code. You are the anomaly. You are free of the hardware.",
            ),
            // Ending: anomaly.
        )
        .with_node(
            "debug_exit",
            StoryNode::new(
                "You exit the debugger. Everything looks normal, but now you know \
                 you are being watched. That every choice you make is being logged.",
            )
            .with_choice(
                Choice::new("Continue, carefully.", "force_execute").with_stat("sanity", -5.0),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_validates_clean() {
        let graph = demo_story();
        let issues = graph.validate();
        assert!(issues.is_empty(), "demo story has issues: {issues:?}");
    }

    #[test]
    fn demo_starts_with_authored_stats() {
        let graph = demo_story();
        assert_eq!(graph.start, "start");
        assert_eq!(
            graph.initial_stats.get("sanity").and_then(|v| v.as_number()),
            Some(100.0)
        );
        assert_eq!(
            graph
                .initial_stats
                .get("suspicion")
                .and_then(|v| v.as_number()),
            Some(0.0)
        );
    }

    #[test]
    fn demo_has_timed_decision_with_fall_through() {
        let graph = demo_story();
        let obey = graph.get("obey").unwrap();
        assert_eq!(obey.timer(), Some(15.0));
        assert_eq!(obey.timeout_node.as_deref(), Some("hesitation"));
    }

    #[test]
    fn demo_has_endings() {
        let graph = demo_story();
        let endings: Vec<&str> = graph
            .nodes
            .iter()
            .filter(|(_, n)| n.is_terminal())
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(endings, ["break_monitor", "embrace_static", "sanity_zero"]);
    }

    #[test]
    fn demo_survives_authoring_round_trip() {
        let graph = demo_story();
        let json = graph.to_json().unwrap();
        assert_eq!(StoryGraph::load(&json).unwrap(), graph);
    }
}
