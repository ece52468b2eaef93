//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`]. The engine
//! treats every key press as one command; there is no repeat synthesis.

pub mod map;

pub use map::{handle_key_event, should_quit};
