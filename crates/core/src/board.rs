//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Rows above the grid (y < 0) are legal for falling pieces but never stored.

use arrayvec::ArrayVec;

use crate::pieces::MinoOffset;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row indices removed by a single clear, top to bottom.
pub type ClearedRows = ArrayVec<u8, { BOARD_HEIGHT as usize }>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Build a board from color ids (0 = empty, 1..=7 = piece kind).
    ///
    /// Unknown ids are treated as empty.
    pub fn from_grid(grid: &[[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) -> Self {
        let mut board = Self::new();
        for (y, row) in grid.iter().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                board.cells[y * BOARD_WIDTH as usize + x] = PieceKind::from_color_id(id);
            }
        }
        board
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check whether a single mino may sit at (x, y).
    ///
    /// Columns must be on the board and rows must be above the floor. Rows
    /// above the top edge are accepted without looking at storage.
    pub fn accepts(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        y < 0 || !self.is_occupied(x, y)
    }

    /// Check whether a whole piece fits with its top-left anchor at (x, y).
    pub fn fits(&self, minos: &[MinoOffset], x: i8, y: i8) -> bool {
        minos
            .iter()
            .all(|&(dx, dy)| self.accepts(x.saturating_add(dx), y.saturating_add(dy)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Remove every full row, letting the rows above fall, and refill the top
    /// with empty rows. Returns the removed row indices (top to bottom).
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        // Bottom-up two-pointer compaction.
        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared.push(read_y as u8);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared.reverse();
        cleared
    }

    /// Write a piece into storage at anchor (x, y).
    ///
    /// Minos above the top edge are dropped; the caller has already checked
    /// the position with [`Board::fits`].
    pub fn lock_piece(&mut self, minos: &[MinoOffset], x: i8, y: i8, kind: PieceKind) {
        for &(dx, dy) in minos {
            self.set(x + dx, y + dy, Some(kind));
        }
    }

    /// Number of filled cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the board into a color-id grid (0 = empty).
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = self.cells[y * width + x].map_or(0, |k| k.color_id());
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_accepts_rows_above_top_edge() {
        let board = Board::new();
        assert!(board.accepts(0, -1));
        assert!(board.accepts(9, -3));
        assert!(!board.accepts(-1, -1));
        assert!(!board.accepts(10, -1));
        assert!(!board.accepts(0, 20));
    }

    #[test]
    fn test_lock_piece_drops_minos_above_grid() {
        let mut board = Board::new();
        let minos = [(0, 0), (0, 1), (0, 2), (0, 3)];
        board.lock_piece(&minos, 4, -2, PieceKind::I);

        assert_eq!(board.filled_count(), 2);
        assert_eq!(board.get(4, 0), Some(Some(PieceKind::I)));
        assert_eq!(board.get(4, 1), Some(Some(PieceKind::I)));
    }

    #[test]
    fn test_u8_grid_roundtrip() {
        let mut grid = [[0u8; 10]; 20];
        grid[5][3] = PieceKind::O.color_id();
        grid[19][9] = PieceKind::L.color_id();

        let board = Board::from_grid(&grid);
        let mut back = [[0u8; 10]; 20];
        board.write_u8_grid(&mut back);

        assert_eq!(grid, back);
    }
}
