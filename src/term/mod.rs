//! Terminal rendering module.
//!
//! `GameView` is pure (snapshot in, framebuffer out) and unit-testable;
//! `TerminalRenderer` owns the raw-mode terminal and flushes framebuffers.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use fb::{CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::TerminalRenderer;
