//! Dihedral symmetries of the square board, used for training-data augmentation.

/// One element of the 8-element dihedral group: `rotations` quarter turns
/// counter-clockwise, followed by a left-right flip when `flip` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symmetry {
    pub rotations: u8,
    pub flip: bool,
}

/// All 8 group elements, in the order `symmetries` returns them.
pub const ALL_SYMMETRIES: [Symmetry; 8] = [
    Symmetry { rotations: 0, flip: false },
    Symmetry { rotations: 0, flip: true },
    Symmetry { rotations: 1, flip: false },
    Symmetry { rotations: 1, flip: true },
    Symmetry { rotations: 2, flip: false },
    Symmetry { rotations: 2, flip: true },
    Symmetry { rotations: 3, flip: false },
    Symmetry { rotations: 3, flip: true },
];

impl Symmetry {
    pub const IDENTITY: Symmetry = Symmetry {
        rotations: 0,
        flip: false,
    };

    /// Destination of source cell `(row, col)` on an `n`×`n` board.
    pub fn map(self, n: usize, row: usize, col: usize) -> (usize, usize) {
        let (mut y, mut x) = (row, col);
        for _ in 0..self.rotations % 4 {
            (y, x) = (n - 1 - x, y);
        }
        if self.flip {
            x = n - 1 - x;
        }
        (y, x)
    }

    /// The group element undoing `self`. Flipped elements are reflections and
    /// therefore their own inverse.
    pub fn inverse(self) -> Symmetry {
        if self.flip {
            self
        } else {
            Symmetry {
                rotations: (4 - self.rotations % 4) % 4,
                flip: false,
            }
        }
    }

    /// Apply to a row-major `n`×`n` grid.
    pub fn apply<T: Clone>(self, n: usize, grid: &[T]) -> Vec<T> {
        assert_eq!(grid.len(), n * n, "grid is not {}x{}", n, n);
        let mut out = grid.to_vec();
        for row in 0..n {
            for col in 0..n {
                let (y, x) = self.map(n, row, col);
                out[y * n + x] = grid[row * n + col].clone();
            }
        }
        out
    }
}
