//! Error types returned by the assembly solver and disassembler.
//!
//! [`SolveError`] covers bad input, caught before any cover matrix is built.
//! [`BugError`] covers internal invariant violations that should never occur
//! for valid input; constructing one is always immediately followed by
//! [`crate::debug_panic`]-style handling at the call site, never propagated
//! to a caller as a recoverable condition.

use thiserror::Error;

use crate::piece::PieceId;

/// An input-validity error, returned before any solving work begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The problem's goal piece id does not name any piece.
    #[error("goal piece {goal_id:?} is not present among the problem's pieces")]
    GoalMissing {
        /// The missing goal piece id.
        goal_id: PieceId,
    },

    /// The goal piece has no voxels.
    #[error("goal piece has no voxels")]
    GoalEmpty,

    /// The problem names no pieces other than the goal.
    #[error("problem has no pieces")]
    NoPieces,

    /// A non-goal piece has an `optional` voxel attribute.
    #[error("piece {label:?} marks voxels optional, but only the goal piece may")]
    OptionalOnNonGoal {
        /// Label of the offending piece, for diagnostics.
        label: String,
    },

    /// The total voxel count contributed by pieces (respecting their count
    /// ranges) cannot possibly equal the goal's voxel count.
    #[error(
        "piece voxel counts cannot sum to the goal's {goal_voxels} voxels \
         (optional range allows {min_possible}..={max_possible})"
    )]
    VoxelCountMismatch {
        /// Number of voxels in the goal.
        goal_voxels: usize,
        /// Smallest possible total across all pieces' count ranges.
        min_possible: usize,
        /// Largest possible total across all pieces' count ranges.
        max_possible: usize,
    },

    /// A piece has zero voxels, or has voxels but no orientation of it fits
    /// anywhere in the goal.
    #[error("piece {label:?} cannot be placed anywhere in the goal")]
    PieceUnplaceable {
        /// Id of the offending piece.
        piece_id: PieceId,
        /// Label of the offending piece, for diagnostics.
        label: String,
    },
}

/// An internal invariant violation: a solver bug, not a problem with the
/// input. Every variant carries enough of the offending state to diagnose
/// the bug from a log line or panic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BugError {
    /// The "space separated parts" pass could not find the latest
    /// separation event between two parts that were found to be touching.
    #[error(
        "could not find a separation event between colliding parts {part_a} and {part_b}"
    )]
    SeparationNotFound {
        /// Index of one of the colliding parts.
        part_a: usize,
        /// Index of the other colliding part.
        part_b: usize,
    },

    /// A cover-solution row mapped back to more than one piece instance,
    /// or to none, when reconstructing an assembly.
    #[error("row {row_index} in cover solution mapped to {pieces_found} pieces, expected 1")]
    MultiplePiecesInRow {
        /// Index of the offending row within the solution.
        row_index: usize,
        /// Number of pieces the row appeared to map to.
        pieces_found: usize,
    },
}
