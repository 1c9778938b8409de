//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! from the engine, the terminal frontend, and the JSON bridge alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_FALL_MS` | 1000 | Fall interval at level 1 |
//! | `FALL_STEP_MS` | 100 | Interval reduction per level |
//! | `MIN_FALL_MS` | 50 | Fastest fall interval |
//! | `LINE_CLEAR_POINTS` | 100 | Points per cleared line, multiplied by level |
//! | `HARD_DROP_POINTS_PER_ROW` | 2 | Points per row of hard-drop distance |
//! | `LINES_PER_LEVEL` | 10 | Lines needed to advance one level |
//!
//! # Examples
//!
//! ```
//! use pixel_tetris_types::{Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(PieceKind::T.color_id(), 3);
//!
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Fall interval at level 1 (1000ms = 1 second per row)
pub const BASE_FALL_MS: u32 = 1000;

/// Fall interval reduction per level above 1
pub const FALL_STEP_MS: u32 = 100;

/// Floor for the fall interval
pub const MIN_FALL_MS: u32 = 50;

/// Points per cleared line at level 1
pub const LINE_CLEAR_POINTS: u32 = 100;

/// Points per row of hard-drop fall distance
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// Cleared lines needed per level step
pub const LINES_PER_LEVEL: u32 = 10;

/// Level of a freshly restarted game
pub const START_LEVEL: u32 = 1;


/// The seven tetromino piece kinds
///
/// Declaration order fixes the color identifier written into the board:
/// I=1, O=2, T=3, S=4, Z=5, J=6, L=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in color-id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Color identifier stored in locked board cells (1..=7)
    pub fn color_id(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Inverse of [`PieceKind::color_id`]; `0` and anything above 7 is empty.
    pub fn from_color_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }
}

/// Commands folded into the game state by the core engine.
///
/// Every command is a no-op (rejected transition) when its preconditions do
/// not hold; none of them can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Move piece one row down, locking it when blocked
    MoveDown,
    /// Rotate piece 90° clockwise in place (no wall kicks)
    Rotate,
    /// Drop piece to its resting row and lock it
    HardDrop,
    /// Promote the next piece to the active slot
    SpawnPiece,
    /// Toggle pause state
    TogglePause,
    /// Reset to an empty, unstarted game
    Restart,
    /// Fall-timer event: spawn when no piece is active, otherwise move down
    Tick,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::MoveDown,
        Command::Rotate,
        Command::HardDrop,
        Command::SpawnPiece,
        Command::TogglePause,
        Command::Restart,
        Command::Tick,
    ];

    /// Parse command from string (case-insensitive)
    ///
    /// Accepts the camelCase wire names plus the upper-case reducer names
    /// used by the desktop UI (`MOVE_LEFT`, `DROP`, ...).
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_tetris_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("TOGGLE_PAUSE"), Some(Command::TogglePause));
    /// assert_eq!(Command::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "movedown" => Some(Command::MoveDown),
            "rotate" => Some(Command::Rotate),
            "harddrop" | "drop" => Some(Command::HardDrop),
            "spawnpiece" | "spawn" => Some(Command::SpawnPiece),
            "togglepause" | "pause" => Some(Command::TogglePause),
            "restart" => Some(Command::Restart),
            "tick" => Some(Command::Tick),
            _ => None,
        }
    }

    /// Convert to camelCase string for the bridge protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::MoveDown => "moveDown",
            Command::Rotate => "rotate",
            Command::HardDrop => "hardDrop",
            Command::SpawnPiece => "spawnPiece",
            Command::TogglePause => "togglePause",
            Command::Restart => "restart",
            Command::Tick => "tick",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;
