//! Terminal front end for Phosphor.
//!
//! A single-threaded, tick-driven presentation layer over
//! [`phosphor_engine::GameController`]. Each node gets one
//! [`cycle::RenderCycle`] that owns every transient handle of its
//! presentation — typewriter, choice stagger, countdown, glitch pulse — so
//! replacing the cycle is the cancellation of all of them at once.

/// Application state and input handling.
pub mod app;
/// The per-node render cycle.
pub mod cycle;
/// Terminal setup, teardown, and the frame loop.
pub mod terminal;
/// Frame drawing.
pub mod view;
