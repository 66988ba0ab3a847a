//! [`Assembly`]: an ordered, voxel-disjoint sequence of pieces.

use std::ops::{Deref, DerefMut};

use crate::grid::Grid;
use crate::piece::Piece;

/// An ordered sequence of pieces whose voxel sets are pairwise disjoint.
///
/// Disjointness is an invariant the solver upholds when constructing an
/// assembly from a cover solution (§4.4's column ranges guarantee no voxel
/// column is covered more than its `max`); the disassembler assumes it holds
/// and never re-checks it.
#[derive(Clone)]
pub struct Assembly<G: Grid>(Vec<Piece<G>>);

impl<G: Grid> Assembly<G> {
    /// Wraps `pieces` as an assembly without checking disjointness; callers
    /// outside this crate should only do this with pieces already known to
    /// be disjoint (e.g. freshly deserialised, or produced by the solver).
    pub fn from_pieces(pieces: Vec<Piece<G>>) -> Self {
        Self(pieces)
    }

    /// Unwraps the assembly into its pieces.
    pub fn into_pieces(self) -> Vec<Piece<G>> {
        self.0
    }

    /// Returns whether this assembly cannot be disassembled any further:
    /// it has at most one piece.
    pub fn is_terminal(&self) -> bool {
        self.0.len() <= 1
    }

    /// Total number of voxels across every piece.
    pub fn voxel_count(&self) -> usize {
        self.0.iter().map(|p| p.voxels.len()).sum()
    }

    /// Finds a piece by its complete id (`"{id}"` or `"{id}-{instance}"`).
    pub fn find_by_complete_id(&self, complete_id: &str) -> Option<&Piece<G>> {
        self.0.iter().find(|p| p.complete_id() == complete_id)
    }
}

impl<G: Grid> Deref for Assembly<G> {
    type Target = [Piece<G>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<G: Grid> DerefMut for Assembly<G> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<G: Grid> IntoIterator for Assembly<G> {
    type Item = Piece<G>;
    type IntoIter = std::vec::IntoIter<Piece<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, G: Grid> IntoIterator for &'a Assembly<G> {
    type Item = &'a Piece<G>;
    type IntoIter = std::slice::Iter<'a, Piece<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
