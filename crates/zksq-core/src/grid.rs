//! # Value Grid
//!
//! The N×N grid the Prover fills in. Each cell carries the user-entered
//! value (if any), the ground-truth solution digit and a lock flag for
//! pre-filled given cells.
//!
//! The grid's dimensions are fixed at construction. Edits replace a single
//! cell's value and nothing else; the solution-reveal toggle is purely a
//! display concern and never leaks into [`ValueGrid::flatten`], which is
//! what feeds the proving backend's public-input vector.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::puzzle::PuzzleLayout;

/// Errors rejecting a grid edit.
///
/// Both variants indicate caller misuse — the session layer keeps them
/// unreachable by rendering given cells read-only and bounding indices.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The target position is outside the grid.
    #[error("cell ({row}, {col}) is out of bounds for a {order}x{order} grid")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Order of the grid.
        order: usize,
    },
    /// The target cell is a pre-filled given.
    #[error("cell ({row}, {col}) is a given and cannot be edited")]
    LockedCell {
        /// Row of the locked cell.
        row: usize,
        /// Column of the locked cell.
        col: usize,
    },
}

/// One cell of the grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cell {
    /// The user-entered digit string; `None` while unfilled.
    value: Option<String>,
    /// The ground-truth digit for this position. Only rendered on request
    /// and never sent to a backend unless copied into `value`.
    solution: String,
    /// Given cells are pre-filled with their solution and reject edits.
    locked: bool,
}

impl Cell {
    /// The user-entered value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The ground-truth digit for this position.
    pub fn solution(&self) -> &str {
        &self.solution
    }

    /// Whether this is a pre-filled given cell.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// The editable N×N value grid.
///
/// Created from a [`PuzzleLayout`] with the given cells pre-filled and
/// locked. One instance per session; [`ValueGrid::set`] is the only
/// mutation of cell values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValueGrid {
    cells: Vec<Vec<Cell>>,
    solution_revealed: bool,
}

impl ValueGrid {
    /// Build the initial grid for a layout: given cells locked at their
    /// solution digit, every other cell empty.
    pub fn from_layout(layout: &PuzzleLayout) -> Self {
        let order = layout.order();
        let cells = (0..order)
            .map(|r| {
                (0..order)
                    .map(|c| {
                        let solution = layout.solution(r, c).to_string();
                        let locked = layout.is_given(r, c);
                        Cell {
                            value: locked.then(|| solution.clone()),
                            solution,
                            locked,
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            cells,
            solution_revealed: false,
        }
    }

    /// Order N of the N×N grid.
    pub fn order(&self) -> usize {
        self.cells.len()
    }

    /// The cell at `(row, col)`, if in bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Replace the value of a single non-given cell.
    ///
    /// An empty `value` clears the cell back to unfilled. Every other cell
    /// is left untouched.
    pub fn set(&mut self, row: usize, col: usize, value: &str) -> Result<(), GridError> {
        let order = self.order();
        let cell = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(GridError::OutOfBounds { row, col, order })?;
        if cell.locked {
            return Err(GridError::LockedCell { row, col });
        }
        cell.value = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        Ok(())
    }

    /// All cell values in row-major order; unfilled cells flatten to the
    /// empty string. This is the basis of the backend's public-input
    /// vector, regardless of the reveal toggle.
    pub fn flatten(&self) -> Vec<String> {
        self.cells
            .iter()
            .flatten()
            .map(|cell| cell.value.clone().unwrap_or_default())
            .collect()
    }

    /// Whether every cell has a value.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.value.is_some())
    }

    /// Copy the solution into every non-given cell.
    pub fn load_solution(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            if !cell.locked {
                cell.value = Some(cell.solution.clone());
            }
        }
    }

    /// Render solutions instead of entered values. Display-only.
    pub fn reveal_solution(&mut self) {
        self.solution_revealed = true;
    }

    /// Render entered values again.
    pub fn hide_solution(&mut self) {
        self.solution_revealed = false;
    }

    /// Whether the display layer should render solutions.
    pub fn solution_revealed(&self) -> bool {
        self.solution_revealed
    }

    /// What the display layer shows for `(row, col)`: the solution while
    /// revealed, otherwise the entered value or the empty string.
    pub fn display_value(&self, row: usize, col: usize) -> Option<&str> {
        self.cell(row, col).map(|cell| {
            if self.solution_revealed {
                cell.solution()
            } else {
                cell.value().unwrap_or("")
            }
        })
    }
}
