//! Render-ready, read-only view of a game state.

use crate::game_state::{ActivePiece, LockEvent, Phase};
use crate::pieces::{spawn_shape, ShapeMatrix};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Board grid of color ids (0 = empty, 1..=7 = piece kind).
pub type ColorGrid = [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub shape: ShapeMatrix,
    pub x: i8,
    pub y: i8,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            x: value.x,
            y: value.y,
        }
    }
}

impl ActiveSnapshot {
    /// Board cells covered by the piece that lie inside the grid.
    pub fn visible_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.shape.minos().into_iter().filter_map(move |(dx, dy)| {
            let x = self.x + dx;
            let y = self.y + dy;
            let inside = x >= 0 && x < BOARD_WIDTH as i8 && y >= 0 && y < BOARD_HEIGHT as i8;
            inside.then_some((x as usize, y as usize))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Locked cells only; the active piece is not part of storage.
    pub board: ColorGrid,
    pub active: Option<ActiveSnapshot>,
    pub next: PieceKind,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub paused: bool,
    pub game_over: bool,
    pub phase: Phase,
    pub last_lock: Option<LockEvent>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// Board with the active piece composited on top, for display only.
    pub fn display_grid(&self) -> ColorGrid {
        let mut grid = self.board;
        if let Some(active) = self.active {
            let id = active.kind.color_id();
            for (x, y) in active.visible_cells() {
                grid[y][x] = id;
            }
        }
        grid
    }

    /// Spawn-orientation matrix of the next piece, for the preview panel.
    pub fn next_preview(&self) -> ShapeMatrix {
        spawn_shape(self.next)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            next: PieceKind::I,
            score: 0,
            level: 1,
            lines: 0,
            paused: false,
            game_over: false,
            phase: Phase::Unstarted,
            last_lock: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameState;

    #[test]
    fn display_grid_overlays_active_without_touching_board() {
        let mut state = GameState::new(1).with_next(PieceKind::T);
        state.apply_action(crate::types::Command::SpawnPiece);
        let snap = state.snapshot();

        let grid = snap.display_grid();
        assert_eq!(grid[0][5], PieceKind::T.color_id());
        assert_eq!(grid[1][4], PieceKind::T.color_id());
        assert_eq!(grid[1][5], PieceKind::T.color_id());
        assert_eq!(grid[1][6], PieceKind::T.color_id());
        assert!(snap.board.iter().flatten().all(|&c| c == 0));
    }

    #[test]
    fn display_grid_skips_cells_above_the_top() {
        let mut snap = GameSnapshot::default();
        snap.active = Some(ActiveSnapshot {
            kind: PieceKind::I,
            shape: spawn_shape(PieceKind::I).rotate_cw(),
            x: 0,
            y: -2,
        });
        let grid = snap.display_grid();
        let filled = grid.iter().flatten().filter(|&&c| c != 0).count();
        assert_eq!(filled, 2);
    }
}
