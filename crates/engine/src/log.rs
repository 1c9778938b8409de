//! JSON-lines transition log.
//!
//! One record per submitted command or timer tick. The log is opt-in
//! (`PIXEL_TETRIS_LOG_PATH` or `--log`); the first write failure disables it
//! and is reported once on stderr.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Serialize;

use pixel_tetris_core::GameState;
use pixel_tetris_types::Command;

pub const LOG_PATH_ENV: &str = "PIXEL_TETRIS_LOG_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    pub ts: u64,
    pub command: &'static str,
    pub accepted: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub game_over: bool,
}

impl TransitionRecord {
    pub fn new(command: Command, accepted: bool, state: &GameState) -> Self {
        Self {
            ts: now_ms(),
            command: command.as_str(),
            accepted,
            score: state.score(),
            level: state.level(),
            lines: state.lines(),
            game_over: state.game_over(),
        }
    }
}

pub struct TransitionLog {
    sink: Option<BufWriter<Box<dyn Write + Send>>>,
    buf: Vec<u8>,
}

impl TransitionLog {
    pub fn disabled() -> Self {
        Self {
            sink: None,
            buf: Vec::new(),
        }
    }

    /// Log into an arbitrary writer.
    pub fn to_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Some(BufWriter::new(writer)),
            buf: Vec::with_capacity(256),
        }
    }

    /// Append to the file at `path`, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open transition log {}", path.display()))?;
        Ok(Self::to_writer(Box::new(file)))
    }

    /// Like [`TransitionLog::open`], but a failure is reported on stderr and
    /// yields a disabled log.
    pub fn open_or_disabled(path: &str) -> Self {
        match Self::open(path) {
            Ok(log) => log,
            Err(e) => {
                eprintln!("[Session] transition log disabled: {:#}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn record(&mut self, command: Command, accepted: bool, state: &GameState) {
        if self.sink.is_none() {
            return;
        }
        self.write_record(&TransitionRecord::new(command, accepted, state));
    }

    pub fn write_record(&mut self, record: &TransitionRecord) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        self.buf.clear();
        if serde_json::to_writer(&mut self.buf, record).is_err() {
            return;
        }
        self.buf.push(b'\n');

        let result = sink.write_all(&self.buf).and_then(|_| sink.flush());
        if let Err(e) = result {
            eprintln!("[Session] transition log disabled: {}", e);
            self.sink = None;
        }
    }
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for TransitionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionLog")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
