//! Pieces module - tetromino shape matrices and rotation
//!
//! Each kind is a square occupancy matrix (2x2, 3x3 or 4x4). Rotation is a
//! plain 90° clockwise matrix turn around the matrix itself, tried once at the
//! same anchor. There is no kick table.

use crate::types::{PieceKind, BOARD_WIDTH};

/// Offset of a single mino relative to the matrix's top-left corner (dx, dy)
pub type MinoOffset = (i8, i8);

/// The four occupied cells of a shape matrix, row-major
pub type PieceShape = [MinoOffset; 4];

/// Largest matrix side used by any kind (the I piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Square boolean occupancy matrix for one rotation of a piece.
///
/// Storage is always 4x4; only the top-left `size` x `size` block is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    size: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

const X: bool = true;
const O: bool = false;

const I_SHAPE: ShapeMatrix = ShapeMatrix {
    size: 4,
    cells: [[O, O, O, O], [X, X, X, X], [O, O, O, O], [O, O, O, O]],
};

const O_SHAPE: ShapeMatrix = ShapeMatrix {
    size: 2,
    cells: [[X, X, O, O], [X, X, O, O], [O; 4], [O; 4]],
};

const T_SHAPE: ShapeMatrix = ShapeMatrix {
    size: 3,
    cells: [[O, X, O, O], [X, X, X, O], [O; 4], [O; 4]],
};

const S_SHAPE: ShapeMatrix = ShapeMatrix {
    size: 3,
    cells: [[O, X, X, O], [X, X, O, O], [O; 4], [O; 4]],
};

const Z_SHAPE: ShapeMatrix = ShapeMatrix {
    size: 3,
    cells: [[X, X, O, O], [O, X, X, O], [O; 4], [O; 4]],
};

const J_SHAPE: ShapeMatrix = ShapeMatrix {
    size: 3,
    cells: [[X, O, O, O], [X, X, X, O], [O; 4], [O; 4]],
};

const L_SHAPE: ShapeMatrix = ShapeMatrix {
    size: 3,
    cells: [[O, O, X, O], [X, X, X, O], [O; 4], [O; 4]],
};

impl ShapeMatrix {
    /// Side length of the matrix.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Occupancy at (row, col); anything outside the matrix is empty.
    pub fn get(&self, row: usize, col: usize) -> bool {
        let n = self.size as usize;
        row < n && col < n && self.cells[row][col]
    }

    /// Rows of the used `size` x `size` block.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        let n = self.size as usize;
        self.cells[..n].iter().map(move |r| &r[..n])
    }

    /// A copy turned 90° clockwise: `rotated[j][n-1-i] = self[i][j]`.
    pub fn rotate_cw(&self) -> Self {
        let n = self.size as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for i in 0..n {
            for j in 0..n {
                cells[j][n - 1 - i] = self.cells[i][j];
            }
        }
        Self {
            size: self.size,
            cells,
        }
    }

    /// Offsets of the occupied cells, row-major.
    pub fn minos(&self) -> PieceShape {
        let mut out = [(0, 0); 4];
        let mut k = 0usize;
        for (dy, row) in self.rows().enumerate() {
            for (dx, &filled) in row.iter().enumerate() {
                if filled && k < out.len() {
                    out[k] = (dx as i8, dy as i8);
                    k += 1;
                }
            }
        }
        out
    }
}

/// Spawn-orientation matrix for a kind.
pub fn spawn_shape(kind: PieceKind) -> ShapeMatrix {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::Z => Z_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
    }
}

/// Horizontally centered spawn column: `floor(width/2) - floor(size/2)`.
pub fn spawn_x(shape: &ShapeMatrix) -> i8 {
    (BOARD_WIDTH / 2) as i8 - (shape.size() / 2) as i8
}

/// Try to rotate clockwise in place.
///
/// Returns the rotated matrix if it fits at the same anchor, `None` otherwise.
pub fn try_rotate(
    shape: &ShapeMatrix,
    fits: impl Fn(&PieceShape) -> bool,
) -> Option<ShapeMatrix> {
    let rotated = shape.rotate_cw();
    fits(&rotated.minos()).then_some(rotated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_four_minos() {
        for kind in PieceKind::ALL {
            let mut shape = spawn_shape(kind);
            for _ in 0..4 {
                let filled = shape.rows().flatten().filter(|c| **c).count();
                assert_eq!(filled, 4, "{:?}", kind);
                shape = shape.rotate_cw();
            }
        }
    }

    #[test]
    fn t_rotates_clockwise() {
        let east = spawn_shape(PieceKind::T).rotate_cw();
        let rows: Vec<Vec<bool>> = east.rows().map(|r| r.to_vec()).collect();
        assert_eq!(
            rows,
            vec![
                vec![false, true, false],
                vec![false, true, true],
                vec![false, true, false],
            ]
        );
    }

    #[test]
    fn get_outside_matrix_is_empty() {
        let o = spawn_shape(PieceKind::O);
        assert!(o.get(1, 1));
        assert!(!o.get(2, 0));
        assert!(!o.get(0, 3));
    }
}
