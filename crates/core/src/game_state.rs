//! Game state module - the engine's aggregate root
//!
//! `GameState` is a plain value. [`GameState::apply`] folds one [`Command`]
//! into a copy and returns it; [`GameState::apply_action`] does the same in
//! place and reports whether the command was accepted. A rejected command
//! leaves every field untouched.
//!
//! The state carries its own piece generator, so a transition depends only on
//! the prior value and the command.

use crate::board::Board;
use crate::pieces::{spawn_shape, spawn_x, try_rotate, PieceShape, ShapeMatrix};
use crate::rng::PiecePicker;
use crate::scoring::{fall_interval_ms, hard_drop_points, level_for_lines, line_clear_points};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{Command, PieceKind, START_LEVEL};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub shape: ShapeMatrix,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    /// Spawn-orientation piece, horizontally centered on row 0
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = spawn_shape(kind);
        Self {
            kind,
            x: spawn_x(&shape),
            y: 0,
            shape,
        }
    }

    pub fn minos(&self) -> PieceShape {
        self.shape.minos()
    }

    pub fn fits(&self, board: &Board) -> bool {
        board.fits(&self.minos(), self.x, self.y)
    }
}

/// Result of the most recent lock, for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    /// Rows fallen during a hard drop (0 for a gravity lock).
    pub drop_distance: u32,
    /// Points awarded by this lock (line clear plus hard drop bonus).
    pub points: u32,
}

/// Lifecycle phase, derived from the stored fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Restarted, nothing spawned yet
    Unstarted,
    /// A piece locked; the next one has not been spawned
    SpawnNeeded,
    Falling,
    Paused,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Unstarted => "unstarted",
            Phase::SpawnNeeded => "spawn_needed",
            Phase::Falling => "falling",
            Phase::Paused => "paused",
            Phase::GameOver => "game_over",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    active: Option<ActivePiece>,
    next: PieceKind,
    picker: PiecePicker,
    score: u32,
    level: u32,
    lines: u32,
    game_over: bool,
    paused: bool,
    /// Successful spawns since the last restart.
    pieces_spawned: u32,
    /// Lock produced by the most recent accepted transition.
    last_lock: Option<LockEvent>,
}

impl GameState {
    /// Create an unstarted game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        let mut picker = PiecePicker::new(seed);
        let next = picker.draw();

        Self {
            board: Board::new(),
            active: None,
            next,
            picker,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            game_over: false,
            paused: false,
            pieces_spawned: 0,
            last_lock: None,
        }
    }

    /// Replace the board (scenario setup for puzzles and tests).
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    /// Set the cumulative line count; the level follows from it.
    pub fn with_lines(mut self, lines: u32) -> Self {
        self.lines = lines;
        self.level = level_for_lines(lines);
        self
    }

    /// Force the kind that the next spawn will use.
    pub fn with_next(mut self, kind: PieceKind) -> Self {
        self.next = kind;
        self
    }

    /// Place a specific active piece (scenario setup).
    pub fn with_active(mut self, piece: ActivePiece) -> Self {
        self.active = Some(piece);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn next(&self) -> PieceKind {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    pub fn last_lock(&self) -> Option<LockEvent> {
        self.last_lock
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if self.paused {
            Phase::Paused
        } else if self.active.is_some() {
            Phase::Falling
        } else if self.pieces_spawned == 0 {
            Phase::Unstarted
        } else {
            Phase::SpawnNeeded
        }
    }

    /// Whether gameplay commands can currently change the state.
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// Fall-timer interval the caller should use for the current level.
    pub fn fall_interval_ms(&self) -> u32 {
        fall_interval_ms(self.level)
    }

    /// Pure transition: fold `command` into a copy of this state.
    pub fn apply(&self, command: Command) -> Self {
        let mut next = self.clone();
        next.apply_action(command);
        next
    }

    /// In-place transition. Returns `false` (and changes nothing) when the
    /// command is rejected.
    pub fn apply_action(&mut self, command: Command) -> bool {
        let prev_lock = self.last_lock.take();

        let accepted = match command {
            Command::MoveLeft => self.try_move(-1, 0),
            Command::MoveRight => self.try_move(1, 0),
            Command::MoveDown => self.move_down(),
            Command::Rotate => self.try_rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::SpawnPiece => self.spawn_piece(),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => self.restart(),
            Command::Tick => self.tick(),
        };

        if !accepted {
            self.last_lock = prev_lock;
        }
        accepted
    }

    /// Promote the next piece to the active slot.
    ///
    /// A blocked spawn position ends the game and leaves the board, the active
    /// slot, and the next kind as they were.
    pub(crate) fn spawn_piece(&mut self) -> bool {
        if !self.playable() {
            return false;
        }

        let piece = ActivePiece::spawn(self.next);
        if !piece.fits(&self.board) {
            self.game_over = true;
            return true;
        }

        self.active = Some(piece);
        self.next = self.picker.draw();
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        true
    }

    /// Try to shift the active piece by (dx, dy)
    pub(crate) fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        if !self.board.fits(&active.minos(), active.x + dx, active.y + dy) {
            return false;
        }

        self.active = Some(ActivePiece {
            x: active.x + dx,
            y: active.y + dy,
            ..active
        });
        true
    }

    /// One row down, or lock in place when blocked.
    pub(crate) fn move_down(&mut self) -> bool {
        if !self.playable() || self.active.is_none() {
            return false;
        }
        if !self.try_move(0, 1) {
            self.lock_piece(0);
        }
        true
    }

    pub(crate) fn try_rotate(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let board = &self.board;
        match try_rotate(&active.shape, |minos| board.fits(minos, active.x, active.y)) {
            // O turns into itself.
            Some(shape) if shape == active.shape => false,
            Some(shape) => {
                self.active = Some(ActivePiece { shape, ..active });
                true
            }
            None => false,
        }
    }

    /// Rows the active piece can still fall.
    pub fn drop_distance(&self) -> Option<u32> {
        let active = self.active?;
        let minos = active.minos();

        let mut distance: i8 = 0;
        while self.board.fits(&minos, active.x, active.y + distance + 1) {
            distance += 1;
        }
        Some(distance as u32)
    }

    /// Row the active piece would rest on after a hard drop.
    pub fn landing_y(&self) -> Option<i8> {
        let active = self.active?;
        self.drop_distance().map(|d| active.y + d as i8)
    }

    pub(crate) fn hard_drop(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        let (Some(active), Some(distance)) = (self.active, self.drop_distance()) else {
            return false;
        };

        self.active = Some(ActivePiece {
            y: active.y + distance as i8,
            ..active
        });
        self.lock_piece(distance);
        true
    }

    /// Merge the active piece into the board, clear lines, and score.
    fn lock_piece(&mut self, drop_distance: u32) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board
            .lock_piece(&active.minos(), active.x, active.y, active.kind);
        let lines_cleared = self.board.clear_full_rows().len() as u32;

        let points = line_clear_points(lines_cleared, self.level)
            .saturating_add(hard_drop_points(drop_distance));

        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(lines_cleared);
        self.level = level_for_lines(self.lines);

        self.last_lock = Some(LockEvent {
            kind: active.kind,
            lines_cleared,
            drop_distance,
            points,
        });
    }

    fn toggle_pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    fn restart(&mut self) -> bool {
        let mut picker = self.picker.clone();
        let next = picker.draw();

        *self = Self {
            board: Board::new(),
            active: None,
            next,
            picker,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            game_over: false,
            paused: false,
            pieces_spawned: 0,
            last_lock: None,
        };
        true
    }

    fn tick(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        if self.active.is_some() {
            self.move_down()
        } else {
            self.spawn_piece()
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.active = self.active.map(ActiveSnapshot::from);
        out.next = self.next;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.phase = self.phase();
        out.last_lock = self.last_lock;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

    fn started(seed: u32, kind: PieceKind) -> GameState {
        let mut state = GameState::new(seed).with_next(kind);
        assert!(state.apply_action(Command::SpawnPiece));
        state
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert!(!state.game_over);
        assert!(!state.paused);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines, 0);
        assert!(state.active.is_none());
        assert!(state.board.is_empty());
        assert_eq!(state.phase(), Phase::Unstarted);
    }

    #[test]
    fn test_spawn_takes_next_and_draws_new_one() {
        let mut state = GameState::new(12345).with_next(PieceKind::T);
        assert!(state.spawn_piece());

        let active = state.active.unwrap();
        assert_eq!(active.kind, PieceKind::T);
        assert_eq!((active.x, active.y), (4, 0));
        assert_eq!(state.pieces_spawned, 1);
        assert_eq!(state.phase(), Phase::Falling);
    }

    #[test]
    fn test_spawn_is_noop_when_paused() {
        let mut state = GameState::new(1);
        state.paused = true;
        let before = state.clone();
        assert!(!state.spawn_piece());
        assert_eq!(state, before);
    }

    #[test]
    fn test_try_move() {
        let mut state = started(12345, PieceKind::T);
        let initial_x = state.active.unwrap().x;

        assert!(state.try_move(1, 0));
        assert_eq!(state.active.unwrap().x, initial_x + 1);

        assert!(state.try_move(-1, 0));
        assert_eq!(state.active.unwrap().x, initial_x);
    }

    #[test]
    fn test_try_move_stops_at_wall() {
        let mut state = started(12345, PieceKind::T);

        let mut moved = 0;
        for _ in 0..10 {
            if state.try_move(-1, 0) {
                moved += 1;
            }
        }
        // T spawns at x=4 with its leftmost column at offset 0.
        assert_eq!(moved, 4);
        assert_eq!(state.active.unwrap().x, 0);
    }

    #[test]
    fn test_rotate_reports_only_real_changes() {
        let mut o = started(1, PieceKind::O);
        assert!(!o.apply_action(Command::Rotate));

        let mut t = started(1, PieceKind::T);
        let shape = t.active.unwrap().shape;
        assert!(t.apply_action(Command::Rotate));
        assert_ne!(t.active.unwrap().shape, shape);
    }

    #[test]
    fn test_move_down_locks_when_blocked() {
        let mut state = started(1, PieceKind::O);
        for _ in 0..18 {
            assert!(state.apply_action(Command::MoveDown));
        }
        assert_eq!(state.active.unwrap().y, 18);

        assert!(state.apply_action(Command::MoveDown));
        assert!(state.active.is_none());
        assert_eq!(state.phase(), Phase::SpawnNeeded);
        assert_eq!(state.board.get(4, 19), Some(Some(PieceKind::O)));
        assert_eq!(state.board.get(5, 18), Some(Some(PieceKind::O)));
        assert_eq!(state.last_lock.unwrap().lines_cleared, 0);
    }

    #[test]
    fn test_rotate_blocked_keeps_shape() {
        let mut state = started(1, PieceKind::I);
        // Horizontal I on row 1; the rotated bar needs column 5, rows 0-3.
        state.board.set(5, 3, Some(PieceKind::Z));

        let before = state.clone();
        assert!(!state.try_rotate());
        assert_eq!(state, before);
    }

    #[test]
    fn test_hard_drop_scores_distance() {
        let mut state = started(1, PieceKind::O);
        assert!(state.apply_action(Command::HardDrop));

        assert!(state.active.is_none());
        assert_eq!(state.score, 36);
        let ev = state.last_lock.unwrap();
        assert_eq!(ev.drop_distance, 18);
        assert_eq!(ev.points, 36);
    }

    #[test]
    fn test_last_lock_survives_rejected_command() {
        let mut state = started(1, PieceKind::O);
        state.apply_action(Command::HardDrop);
        let ev = state.last_lock;
        assert!(ev.is_some());

        assert!(!state.apply_action(Command::MoveLeft));
        assert_eq!(state.last_lock, ev);

        assert!(state.apply_action(Command::SpawnPiece));
        assert_eq!(state.last_lock, None);
    }

    #[test]
    fn test_tick_spawns_then_falls() {
        let mut state = GameState::new(5).with_next(PieceKind::L);

        assert!(state.apply_action(Command::Tick));
        assert_eq!(state.active.unwrap().y, 0);

        assert!(state.apply_action(Command::Tick));
        assert_eq!(state.active.unwrap().y, 1);
    }

    #[test]
    fn test_toggle_pause_rejected_after_game_over() {
        let mut state = GameState::new(1);
        state.game_over = true;
        assert!(!state.apply_action(Command::TogglePause));
        assert!(!state.paused);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = started(9, PieceKind::I).with_lines(42);
        state.score = 5000;
        state.paused = true;
        state.board.set(0, 19, Some(PieceKind::J));

        assert!(state.apply_action(Command::Restart));
        assert!(state.board.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines, 0);
        assert!(!state.paused);
        assert!(!state.game_over);
        assert!(state.active.is_none());
        assert_eq!(state.phase(), Phase::Unstarted);
    }

    #[test]
    fn test_apply_does_not_touch_receiver() {
        let state = started(3, PieceKind::S);
        let before = state.clone();
        let after = state.apply(Command::MoveRight);

        assert_eq!(state, before);
        assert_eq!(after.active.unwrap().x, before.active.unwrap().x + 1);
    }

    #[test]
    fn test_landing_y() {
        let state = started(1, PieceKind::I);
        // The I piece occupies matrix row 1, so it rests with anchor y = 18.
        assert_eq!(state.landing_y(), Some(18));
        assert_eq!(state.drop_distance(), Some(18));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let state = started(1, PieceKind::J);
        let snap = state.snapshot();

        assert_eq!(snap.board, [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]);
        assert_eq!(snap.active.unwrap().kind, PieceKind::J);
        assert_eq!(snap.next, state.next);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.phase, Phase::Falling);
    }
}
