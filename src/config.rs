//! Runtime configuration: environment variables with command-line overrides.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};

use crate::engine::{Session, TransitionLog, LOG_PATH_ENV};

pub const SEED_ENV: &str = "PIXEL_TETRIS_SEED";

pub const DEFAULT_CELL_WIDTH: u16 = 2;
pub const MAX_CELL_WIDTH: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Interactive terminal game (default).
    Terminal,
    /// JSON-lines bridge on stdin/stdout.
    Bridge,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub seed: u32,
    pub log_path: Option<String>,
    pub cell_width: u16,
    pub manual_ticks: bool,
}

pub const USAGE: &str = "\
usage: pixel-tetris [bridge] [options]

modes:
  (none)            play in the terminal
  bridge            JSON-lines bridge on stdin/stdout

options:
  --seed N          piece generator seed          (env PIXEL_TETRIS_SEED)
  --log PATH        JSON-lines transition log     (env PIXEL_TETRIS_LOG_PATH)
  --cell-width N    terminal columns per cell, 1-4 (default 2)
  --manual-ticks    bridge only: no internal fall timer
  -h, --help        show this help";

impl Config {
    /// Read the process environment and arguments (without the program name).
    pub fn from_env_and_args(args: &[String]) -> Result<Self> {
        Self::parse(args, |key| std::env::var(key).ok())
    }

    /// Parse `args`, using `env` for variable lookup. CLI flags win over env.
    pub fn parse(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| {
            env(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut seed = match non_empty(SEED_ENV) {
            Some(v) => Some(parse_seed(&v).map_err(|_| anyhow!("invalid {}: {}", SEED_ENV, v))?),
            None => None,
        };
        let mut log_path = non_empty(LOG_PATH_ENV);
        let mut cell_width = DEFAULT_CELL_WIDTH;
        let mut manual_ticks = false;
        let mut mode = Mode::Terminal;

        let mut rest = args;
        if let Some(first) = rest.first() {
            if first == "bridge" {
                mode = Mode::Bridge;
                rest = &rest[1..];
            }
        }

        let mut i = 0usize;
        while i < rest.len() {
            match rest[i].as_str() {
                "--seed" => {
                    i += 1;
                    let v = rest
                        .get(i)
                        .ok_or_else(|| anyhow!("missing value for --seed"))?;
                    seed = Some(parse_seed(v).map_err(|_| anyhow!("invalid --seed value: {}", v))?);
                }
                "--log" => {
                    i += 1;
                    let v = rest
                        .get(i)
                        .ok_or_else(|| anyhow!("missing value for --log"))?;
                    log_path = Some(v.clone());
                }
                "--cell-width" => {
                    i += 1;
                    let v = rest
                        .get(i)
                        .ok_or_else(|| anyhow!("missing value for --cell-width"))?;
                    cell_width = v
                        .parse::<u16>()
                        .ok()
                        .filter(|w| (1..=MAX_CELL_WIDTH).contains(w))
                        .ok_or_else(|| anyhow!("invalid --cell-width value: {} (expected 1-4)", v))?;
                }
                "--manual-ticks" => manual_ticks = true,
                "-h" | "--help" => mode = Mode::Help,
                other => return Err(anyhow!("unknown argument: {}", other)),
            }
            i += 1;
        }

        if manual_ticks && mode == Mode::Terminal {
            return Err(anyhow!("--manual-ticks is only valid with the bridge mode"));
        }

        Ok(Self {
            mode,
            seed: seed.unwrap_or_else(clock_seed),
            log_path,
            cell_width,
            manual_ticks,
        })
    }

    /// A fresh session with this configuration's seed and log.
    pub fn session(&self) -> Session {
        let log = match &self.log_path {
            Some(path) => TransitionLog::open_or_disabled(path),
            None => TransitionLog::disabled(),
        };
        Session::new(self.seed).with_log(log)
    }
}

fn parse_seed(v: &str) -> Result<u32, std::num::ParseIntError> {
    v.trim().parse::<u32>()
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
