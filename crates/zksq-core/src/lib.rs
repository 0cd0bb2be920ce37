//! # zksq-core — Puzzle Data Model
//!
//! Pure data model for the interactive zero-knowledge magic-square
//! demonstration. No I/O, no proving — just the grid the Prover edits and
//! the fixed puzzle layout it is initialized from.
//!
//! ## Architecture
//!
//! - **Grid** (`grid.rs`): [`ValueGrid`] holds an N×N matrix of [`Cell`]s.
//!   Given cells are locked and pre-filled; the remaining cells carry the
//!   Prover's entries. Editing is single-cell replacement only — the grid
//!   never changes shape after construction.
//!
//! - **Puzzle** (`puzzle.rs`): [`PuzzleLayout`] is the immutable puzzle
//!   definition (solution digits, given-cell mask, target sum) plus the
//!   magic-square sum check shared with the proving backends.
//!
//! ## Crate Policy
//!
//! - Leaf crate: depends only on `serde` and `thiserror`.
//! - No `unsafe`.

#![forbid(unsafe_code)]

pub mod grid;
pub mod puzzle;

pub use grid::{Cell, GridError, ValueGrid};
pub use puzzle::{is_magic, LayoutError, PuzzleLayout};
