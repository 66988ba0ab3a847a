//! The [`Grid`] trait: the only geometry-aware object the solver touches.
//!
//! Everything else in this workspace is abstract over `Grid` — the placement
//! enumerator, the symmetry reducer, and the disassembler never look at a
//! coordinate directly. A grid crate (e.g. `puzzle_grid_cubic`) supplies
//! concrete `Voxel`/`Transform`/`Bounds` types and implements the methods
//! below; see each grid crate's module docs for the geometry it represents.

use std::fmt;
use std::hash::Hash;

/// Geometry provider consumed by the solver.
///
/// A `Grid` is the only place that understands what a voxel or a transform
/// *means*; the solver only ever copies, compares, and hashes them.
pub trait Grid {
    /// Opaque cell identifier.
    type Voxel: Copy + Eq + Hash + fmt::Debug;
    /// Opaque deterministic mapping from a voxel list to a voxel list of the
    /// same length, index-preserving.
    type Transform: Copy + Eq + Hash + fmt::Debug;
    /// Smallest axis-aligned region covering a set of voxels.
    type Bounds: Clone + fmt::Debug;

    /// Enumerates every voxel within `bounds`.
    fn voxels_in_bounds(&self, bounds: &Self::Bounds) -> Vec<Self::Voxel>;

    /// Returns the smallest bounds covering `voxels`.
    ///
    /// Panics or returns an implementation-defined empty bounds if `voxels`
    /// is empty; callers in this workspace never call it on an empty slice.
    fn voxel_bounds(&self, voxels: &[Self::Voxel]) -> Self::Bounds;

    /// Returns the smallest bounds covering a set of bounds.
    fn bounds_union(&self, bounds: &[Self::Bounds]) -> Self::Bounds;

    /// Returns the canonical "lowest" voxel of `bounds`, used as a stable
    /// translation anchor when canonicalizing orientations.
    fn bounds_origin(&self, bounds: &Self::Bounds) -> Self::Voxel;

    /// Applies `t` to each voxel in `voxels`, preserving length and index
    /// order. For a rotation this is *not* centered on `voxels` — it is a
    /// fixed mapping about the grid's origin. For a translation it is a pure
    /// shift.
    fn apply_transform(&self, t: Self::Transform, voxels: &[Self::Voxel]) -> Vec<Self::Voxel>;

    /// Composes `t` with itself `n` times. Negative `n` composes the inverse.
    /// `n == 0` returns the identity transform.
    fn scale_transform(&self, t: Self::Transform, n: i32) -> Self::Transform;

    /// Returns the finite symmetry group of the grid: proper rotations, plus
    /// mirror images too if `include_mirrors` is set.
    fn rotations(&self, include_mirrors: bool) -> Vec<Self::Transform>;

    /// Returns the translation mapping `from` to `to`.
    fn translation(&self, from: Self::Voxel, to: Self::Voxel) -> Self::Transform;

    /// Returns the minimal set of generating transforms for disassembly
    /// motion (typically ±1 step along each grid axis).
    fn disassembly_transforms(&self) -> Vec<Self::Transform>;

    /// Returns whether `a` and `b` are disjoint *and* no voxel of `a` is
    /// adjacent to any voxel of `b`, under this grid's adjacency relation.
    fn is_separate(&self, a: &[Self::Voxel], b: &[Self::Voxel]) -> bool;

    /// Returns whether two orientations of a piece are related by a pure
    /// translation (no rotation component), by translating both to the same
    /// canonical origin and comparing the resulting voxel sets.
    ///
    /// A default implementation is provided in terms of [`Self::voxel_bounds`],
    /// [`Self::bounds_origin`], and [`Self::translation`]; grids rarely need to
    /// override it.
    fn is_translation_congruent(&self, a: &[Self::Voxel], b: &[Self::Voxel]) -> bool {
        use std::collections::HashSet;
        if a.len() != b.len() {
            return false;
        }
        let a_origin = self.bounds_origin(&self.voxel_bounds(a));
        let b_origin = self.bounds_origin(&self.voxel_bounds(b));
        let t = self.translation(b_origin, a_origin);
        let translated_b: HashSet<Self::Voxel> =
            self.apply_transform(t, b).into_iter().collect();
        let a_set: HashSet<Self::Voxel> = a.iter().copied().collect();
        translated_b == a_set
    }
}
