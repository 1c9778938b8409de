//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`]. There is no
//! auto-shift logic: the terminal's own key repeat drives held movement.

pub mod map;

pub use pixel_tetris_types as types;

pub use map::{handle_key_event, is_actionable, is_start_key, should_quit};
