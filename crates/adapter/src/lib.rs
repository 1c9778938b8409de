//! Adapter module - drive the game from another process over JSON lines
//!
//! The bridge lets a non-Rust UI (for example the browser desktop shell) use
//! the engine as a headless subprocess. It reads one JSON message per line
//! from stdin and writes one JSON message per line to stdout.
//!
//! # Message Types
//!
//! ## Client → Bridge
//!
//! - **start**: leave the start screen; runs `restart` then `spawnPiece`
//! - **command**: apply a list of commands in order
//! - **snapshot**: request an observation
//!
//! ## Bridge → Client
//!
//! - **ack**: per-command acceptance for a `command` message
//! - **observation**: full game state, once per message or timer wake that
//!   changed the state, and on request
//! - **error**: malformed or out-of-order input; never ends the bridge
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Bridge: {"type":"start","seq":1}
//! Bridge -> Client: {"type":"observation","seq":1,"phase":"falling",...}
//! Client -> Bridge: {"type":"command","seq":2,"commands":["moveLeft","rotate","hardDrop"]}
//! Bridge -> Client: {"type":"ack","seq":2,"accepted":[true,true,true]}
//! Bridge -> Client: {"type":"observation","seq":2,"phase":"spawn_needed",...}
//! Bridge -> Client: {"type":"observation","seq":0,"phase":"falling",...}
//! ```
//!
//! With `--manual-ticks` the internal timer is off and the client sends
//! `"tick"` commands itself. EOF on stdin ends the bridge.

pub mod bridge;
pub mod protocol;

pub use pixel_tetris_core as core;
pub use pixel_tetris_engine as engine;
pub use pixel_tetris_types as types;

pub use bridge::{run_bridge, run_stdio, run_stdio_blocking, BridgeOptions};
pub use protocol::*;
