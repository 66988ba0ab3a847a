//! Placement enumerator (§4.2): every distinct orientation × translation of a
//! piece that fits inside a goal's voxel set.

use std::collections::HashSet;

use puzzle_core::{Grid, Piece};
#[cfg(test)]
use puzzle_util::ti::TypedIndex;

/// A piece after applying one rotation and one translation; just a [`Piece`]
/// whose voxels have been moved into place, still carrying its original id.
pub type Placement<G> = Piece<G>;

/// Computes `Orient(piece) = { apply(r, piece) : r ∈ rotations }`, quotiented
/// by translation congruence (one representative per class), in the order
/// rotations are encountered.
pub fn distinct_orientations<G: Grid>(
    grid: &G,
    piece: &Piece<G>,
    rotations: &[G::Transform],
) -> Vec<Piece<G>> {
    let mut representatives: Vec<Piece<G>> = Vec::new();
    for &r in rotations {
        let voxels = grid.apply_transform(r, &piece.voxels);
        if representatives
            .iter()
            .any(|rep| grid.is_translation_congruent(&rep.voxels, &voxels))
        {
            continue;
        }
        representatives.push(piece.with_voxels(voxels));
    }
    representatives
}

/// Enumerates every placement of `piece` inside `goal_voxels`: every
/// translation of every distinct orientation such that all of the
/// orientation's voxels land inside `goal_voxels`.
///
/// `goal_voxels` must be given in a deterministic order (the goal piece's own
/// voxel order is fine) — placements are emitted orientation-by-orientation,
/// goal-voxel-by-goal-voxel, so solve output stays deterministic.
///
/// Panics in debug builds if `piece` has no voxels; the facade validates this
/// before calling in (§4.2's "a piece with zero voxels is an error").
pub fn enumerate_placements<G: Grid>(
    grid: &G,
    goal_voxels: &[G::Voxel],
    piece: &Piece<G>,
    rotations: &[G::Transform],
) -> Vec<Placement<G>> {
    debug_assert!(!piece.voxels.is_empty(), "piece has no voxels");
    let goal_set: HashSet<G::Voxel> = goal_voxels.iter().copied().collect();
    let orientations = distinct_orientations(grid, piece, rotations);

    let mut placements = Vec::new();
    for orientation in &orientations {
        let anchor = orientation.voxels[0];
        for &v in goal_voxels {
            let t = grid.translation(anchor, v);
            let placed = grid.apply_transform(t, &orientation.voxels);
            if placed.iter().all(|pv| goal_set.contains(pv)) {
                placements.push(orientation.with_voxels(placed));
            }
        }
    }
    placements
}
