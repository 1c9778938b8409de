//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the game rules and the state transition function.
//! It has **zero dependencies** on UI, timers, or I/O:
//!
//! - **Deterministic**: the piece generator lives inside the state, so the
//!   same seed and command stream always produce the same game
//! - **Pure**: [`GameState::apply`] returns a new state and never mutates its input
//! - **Portable**: the same engine drives the terminal frontend and the JSON bridge
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid, validity predicate, locking and line clearing
//! - [`pieces`]: square shape matrices and clockwise rotation (no wall kicks)
//! - [`rng`]: uniform, memoryless piece selection
//! - [`scoring`]: points, level progression and fall cadence
//! - [`game_state`]: the aggregate root and its command handling
//! - [`snapshot`]: render-ready view consumed by display collaborators
//!
//! # Example
//!
//! ```
//! use pixel_tetris_core::GameState;
//! use pixel_tetris_types::Command;
//!
//! // Restart, then spawn: the two-step start sequence.
//! let game = GameState::new(12345)
//!     .apply(Command::Restart)
//!     .apply(Command::SpawnPiece);
//! assert!(game.active().is_some());
//!
//! let dropped = game.apply(Command::HardDrop);
//! assert!(dropped.active().is_none());
//! assert!(dropped.score() > 0); // hard drop awards 2 points per row
//! ```
//!
//! # Timing
//!
//! The engine keeps no timers. Callers issue [`Command::Tick`](types::Command::Tick)
//! every [`GameState::fall_interval_ms`] milliseconds, re-reading the interval
//! after each transition.

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use pixel_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{ActivePiece, GameState, LockEvent, Phase};
pub use pieces::{spawn_shape, try_rotate, ShapeMatrix};
pub use rng::{PiecePicker, SimpleRng};
pub use scoring::{fall_interval_ms, hard_drop_points, level_for_lines, line_clear_points};
pub use snapshot::{ActiveSnapshot, ColorGrid, GameSnapshot};
