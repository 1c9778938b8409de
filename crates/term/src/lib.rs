//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal gameplay. It renders
//! into a plain framebuffer that is diffed and flushed through crossterm;
//! no widget toolkit is involved.
//!
//! Goals:
//! - Keep `core` free of any display concerns
//! - Control the aspect ratio directly (columns per board cell)
//! - Only write the glyphs that changed between frames

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use pixel_tetris_core as core;
pub use pixel_tetris_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{piece_color, AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
