//! Assembly solver and disassembly analyser for the mechanical puzzle design
//! toolkit.
//!
//! Everything in this crate is generic over [`puzzle_core::Grid`]: this
//! crate never touches a concrete coordinate type, only the geometry a grid
//! crate (`puzzle_grid_cubic`, `puzzle_grid_square`, `puzzle_grid_rhombic`)
//! exposes through that trait.
//!
//! [`facade::solve`] is the entry point most callers want; the other
//! modules are its building blocks, exposed for callers that need to drive
//! part of the pipeline themselves (e.g. enumerating placements for a UI
//! preview without running a full solve).

mod dedup;
mod disassembler;
mod dlx;
mod facade;
mod movement;
mod placement;
mod symmetry;

#[cfg(test)]
mod test_grid;

pub use dedup::dedup_symmetric_assemblies;
pub use disassembler::{disassemble, space_separated_parts, DisassemblyOutcome};
pub use dlx::{ColumnRange, Matrix};
pub use facade::{solve, SolveConfig};
pub use movement::{enumerate_movements, Movement};
pub use placement::{distinct_orientations, enumerate_placements, Placement};
pub use symmetry::{choose_symmetry_piece, SymmetryChoice};

#[cfg(test)]
mod tests;
