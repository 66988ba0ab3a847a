//! Grid abstraction, piece model, and assembly/disassembly data types for the
//! mechanical puzzle solver.
//!
//! This crate defines the vocabulary that [`puzzle_solver`](../puzzle_solver)
//! and the various grid crates (`puzzle_grid_cubic`, `puzzle_grid_square`,
//! `puzzle_grid_rhombic`) share. It does not itself enumerate placements,
//! solve exact cover, or search for disassemblies — see `puzzle_solver` for
//! that.

#![allow(clippy::type_complexity)]

/// Panics in debug builds, logs an error and falls through in release
/// builds. Used right before constructing a [`BugError`] value: these
/// indicate a solver bug, not bad input, so a debug build should stop hard
/// while a release build should recover to a safe default and keep serving
/// other requests.
#[macro_export]
macro_rules! debug_panic {
    ($($tok:tt)*) => {
        match cfg!(debug_assertions) {
            true => panic!($($tok)*),
            false => log::error!($($tok)*),
        }
    };
}

pub mod assembly;
pub mod callbacks;
pub mod disassembly;
pub mod error;
pub mod grid;
pub mod piece;
pub mod problem;
pub mod solution;


pub use assembly::Assembly;
pub use callbacks::TaskCallbacks;
pub use disassembly::{Disassembly, DisassemblyStep};
pub use error::{BugError, SolveError};
pub use grid::Grid;
pub use piece::{Piece, PieceId};
pub use problem::{CountRange, Problem, Puzzle, SymmetryReduction};
pub use solution::Solution;
