//! # Puzzle Layout
//!
//! The immutable definition of one magic-square puzzle: the full solution,
//! the mask of pre-filled given cells, and the target sum every row, column
//! and diagonal must reach.
//!
//! A layout is validated at construction — the solution must actually be a
//! magic square for the declared target — so every grid initialized from a
//! [`PuzzleLayout`] starts from a solvable position.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a [`PuzzleLayout`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// The solution matrix is not square.
    #[error("solution has {rows} rows but row {row} has {cols} columns")]
    NotSquare {
        /// Number of rows in the solution.
        rows: usize,
        /// Index of the offending row.
        row: usize,
        /// Number of columns in that row.
        cols: usize,
    },
    /// The given mask does not match the solution's dimensions.
    #[error("given mask shape does not match the {order}×{order} solution")]
    MaskMismatch {
        /// Order of the solution matrix.
        order: usize,
    },
    /// A solution entry is not a decimal number.
    #[error("solution cell ({row}, {col}) is not a decimal number: {value:?}")]
    BadDigit {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// The rejected cell content.
        value: String,
    },
    /// The solution does not satisfy the magic-square constraint.
    #[error("solution is not a magic square for target sum {target}")]
    NotMagic {
        /// The declared target sum.
        target: u64,
    },
}

/// Check the magic-square constraint: every row, every column and both main
/// diagonals of the row-major `values` matrix of the given `order` sum to
/// `target`.
///
/// Returns `false` when `values.len() != order * order`.
pub fn is_magic(values: &[u64], order: usize, target: u64) -> bool {
    if order == 0 || values.len() != order * order {
        return false;
    }

    let at = |r: usize, c: usize| values[r * order + c];

    for r in 0..order {
        let row_sum: u64 = (0..order).map(|c| at(r, c)).sum();
        if row_sum != target {
            return false;
        }
    }
    for c in 0..order {
        let col_sum: u64 = (0..order).map(|r| at(r, c)).sum();
        if col_sum != target {
            return false;
        }
    }

    let diag: u64 = (0..order).map(|i| at(i, i)).sum();
    let anti: u64 = (0..order).map(|i| at(i, order - 1 - i)).sum();
    diag == target && anti == target
}

/// The immutable definition of one puzzle.
///
/// Holds the ground-truth solution, the mask of given (pre-filled, locked)
/// cells and the target sum. Shared read-only between the grid constructor,
/// the orchestration layer (which appends the target to the public-input
/// vector) and the display layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PuzzleLayout {
    solution: Vec<Vec<String>>,
    givens: Vec<Vec<bool>>,
    target_sum: u64,
}

impl PuzzleLayout {
    /// Construct a validated layout.
    ///
    /// Rejects non-square solutions, mask shape mismatches, non-decimal
    /// solution entries and solutions that are not a magic square for
    /// `target_sum`.
    pub fn new(
        solution: Vec<Vec<String>>,
        givens: Vec<Vec<bool>>,
        target_sum: u64,
    ) -> Result<Self, LayoutError> {
        let order = solution.len();
        for (row, cells) in solution.iter().enumerate() {
            if cells.len() != order {
                return Err(LayoutError::NotSquare {
                    rows: order,
                    row,
                    cols: cells.len(),
                });
            }
        }
        if givens.len() != order || givens.iter().any(|row| row.len() != order) {
            return Err(LayoutError::MaskMismatch { order });
        }

        let mut values = Vec::with_capacity(order * order);
        for (r, cells) in solution.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                let parsed = cell.parse::<u64>().map_err(|_| LayoutError::BadDigit {
                    row: r,
                    col: c,
                    value: cell.clone(),
                })?;
                values.push(parsed);
            }
        }
        if !is_magic(&values, order, target_sum) {
            return Err(LayoutError::NotMagic { target: target_sum });
        }

        Ok(Self {
            solution,
            givens,
            target_sum,
        })
    }

    /// The canonical 3×3 puzzle shipped with the demonstration.
    ///
    /// Rows sum to 111; the givens are 7 at (0,2), 13 at (1,0) and
    /// 37 at (1,1).
    pub fn magic_3x3() -> Self {
        let solution = [
            ["31", "73", "7"],
            ["13", "37", "61"],
            ["67", "1", "43"],
        ]
        .map(|row| row.map(str::to_string).to_vec())
        .to_vec();
        let givens = [
            [false, false, true],
            [true, true, false],
            [false, false, false],
        ]
        .map(|row| row.to_vec())
        .to_vec();

        Self {
            solution,
            givens,
            target_sum: 111,
        }
    }

    /// Order N of the N×N puzzle.
    pub fn order(&self) -> usize {
        self.solution.len()
    }

    /// The sum every row, column and diagonal must reach.
    pub fn target_sum(&self) -> u64 {
        self.target_sum
    }

    /// The ground-truth digit at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics when the position is out of bounds; callers index within
    /// `0..order()`.
    pub fn solution(&self, row: usize, col: usize) -> &str {
        &self.solution[row][col]
    }

    /// Whether `(row, col)` is a pre-filled given cell.
    pub fn is_given(&self, row: usize, col: usize) -> bool {
        self.givens[row][col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn canonical_layout_is_valid() {
        let layout = PuzzleLayout::magic_3x3();
        assert_eq!(layout.order(), 3);
        assert_eq!(layout.target_sum(), 111);
        assert_eq!(layout.solution(0, 0), "31");
        assert_eq!(layout.solution(2, 1), "1");
        assert!(layout.is_given(0, 2));
        assert!(layout.is_given(1, 0));
        assert!(layout.is_given(1, 1));
        assert!(!layout.is_given(2, 2));
    }

    #[test]
    fn canonical_layout_passes_its_own_validation() {
        let canonical = PuzzleLayout::magic_3x3();
        let revalidated = PuzzleLayout::new(
            (0..3)
                .map(|r| (0..3).map(|c| canonical.solution(r, c).to_string()).collect())
                .collect(),
            (0..3)
                .map(|r| (0..3).map(|c| canonical.is_given(r, c)).collect())
                .collect(),
            111,
        )
        .unwrap();
        assert_eq!(revalidated, canonical);
    }

    #[test]
    fn is_magic_accepts_canonical_square() {
        let values = [31, 73, 7, 13, 37, 61, 67, 1, 43];
        assert!(is_magic(&values, 3, 111));
    }

    #[test]
    fn is_magic_rejects_wrong_row_sum() {
        let values = [31, 73, 8, 13, 37, 61, 67, 1, 43];
        assert!(!is_magic(&values, 3, 111));
    }

    #[test]
    fn is_magic_rejects_broken_diagonal() {
        // Rows and columns all sum to 6, the main diagonal does not.
        let values = [1, 2, 3, 3, 1, 2, 2, 3, 1];
        assert!(!is_magic(&values, 3, 6));
    }

    #[test]
    fn is_magic_rejects_wrong_length() {
        assert!(!is_magic(&[1, 2, 3], 3, 6));
        assert!(!is_magic(&[], 0, 0));
    }

    #[test]
    fn new_rejects_non_square_solution() {
        let err = PuzzleLayout::new(
            rows(&[&["1", "2"], &["3"]]),
            vec![vec![false; 2]; 2],
            3,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::NotSquare { row: 1, cols: 1, .. }));
    }

    #[test]
    fn new_rejects_mask_mismatch() {
        let err = PuzzleLayout::new(
            rows(&[&["2", "7", "6"], &["9", "5", "1"], &["4", "3", "8"]]),
            vec![vec![false; 3]; 2],
            15,
        )
        .unwrap_err();
        assert_eq!(err, LayoutError::MaskMismatch { order: 3 });
    }

    #[test]
    fn new_rejects_non_decimal_entry() {
        let err = PuzzleLayout::new(
            rows(&[&["2", "7", "6"], &["9", "x", "1"], &["4", "3", "8"]]),
            vec![vec![false; 3]; 3],
            15,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::BadDigit { row: 1, col: 1, .. }));
    }

    #[test]
    fn new_rejects_non_magic_solution() {
        let err = PuzzleLayout::new(
            rows(&[&["1", "2", "3"], &["4", "5", "6"], &["7", "8", "9"]]),
            vec![vec![false; 3]; 3],
            15,
        )
        .unwrap_err();
        assert_eq!(err, LayoutError::NotMagic { target: 15 });
    }

    #[test]
    fn layout_serialization_roundtrip() {
        let layout = PuzzleLayout::magic_3x3();
        let json = serde_json::to_string(&layout).unwrap();
        let deser: PuzzleLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(deser, layout);
    }
}
