//! Scheduling and session plumbing around the pure core.
//!
//! - [`FallClock`]: accumulates host time and hands out fall ticks
//! - [`Session`]: start screen, command submission, tick folding
//! - [`TransitionLog`]: optional JSON-lines record of every transition

pub mod clock;
pub mod log;
pub mod session;

pub use clock::FallClock;
pub use log::{TransitionLog, TransitionRecord, LOG_PATH_ENV};
pub use session::Session;
