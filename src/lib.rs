//! Pixel Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates as `pixel_tetris::{core, engine, input,
//! term, adapter, types}` and owns the runtime configuration shared by the
//! binary's two modes.

pub mod config;

pub use pixel_tetris_adapter as adapter;
pub use pixel_tetris_core as core;
pub use pixel_tetris_engine as engine;
pub use pixel_tetris_input as input;
pub use pixel_tetris_term as term;
pub use pixel_tetris_types as types;

pub use config::{Config, Mode};
