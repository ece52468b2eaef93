//! Terminal falling-block puzzle.
//!
//! The [`core`] module is the pure simulation engine (grid, pieces, gravity,
//! scoring, observer streams). [`input`], [`term`], and [`leaderboard`] are
//! its collaborators: they consume snapshots and invoke commands but never
//! reach into engine state.

pub mod core;
pub mod input;
pub mod leaderboard;
pub mod term;
pub mod types;
