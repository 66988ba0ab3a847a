//! Symmetry reducer (§4.3): choose one "symmetry-breaking" piece whose
//! restricted orientation set quotients out duplicate cover solutions that
//! differ only by a global symmetry of the goal.

use puzzle_core::{CountRange, Grid, Piece, PieceId};

/// The chosen symmetry-breaking piece, the rotation subset it's restricted
/// to, and the reduction factor that justified picking it.
pub struct SymmetryChoice<G: Grid> {
    /// Id of the piece whose orientations are restricted.
    pub piece_id: PieceId,
    /// The rotations that piece is allowed to use (a subset of the full
    /// rotation list passed in).
    pub allowed_rotations: Vec<G::Transform>,
    /// `(piece-only orientation classes) / (orientation classes after also
    /// quotienting by the goal's symmetry)`. Always `> 1.0` for a returned
    /// choice — `choose` discards anything that doesn't help.
    pub reduction: f64,
}

/// For each rotation index, the index of the first rotation found congruent
/// to it (translation-congruence of `apply(rotations[i], voxels)`). Equal
/// values mean "same equivalence class"; the number of indices where
/// `class[i] == i` is the number of distinct classes.
fn rotation_classes<G: Grid>(
    grid: &G,
    voxels: &[G::Voxel],
    rotations: &[G::Transform],
) -> Vec<usize> {
    let transformed: Vec<Vec<G::Voxel>> =
        rotations.iter().map(|&r| grid.apply_transform(r, voxels)).collect();
    let mut reps: Vec<usize> = Vec::new();
    let mut class_of = vec![0usize; rotations.len()];
    for i in 0..rotations.len() {
        match reps
            .iter()
            .copied()
            .find(|&rep| grid.is_translation_congruent(&transformed[rep], &transformed[i]))
        {
            Some(rep) => class_of[i] = rep,
            None => {
                reps.push(i);
                class_of[i] = i;
            }
        }
    }
    class_of
}

/// Scans rotation indices low to high, keeping one representative per
/// equivalence class under the union of "same piece class" and "same goal
/// class", per §4.3 step 2.
fn allowed_mask(piece_classes: &[usize], goal_classes: &[usize]) -> Vec<bool> {
    let n = piece_classes.len();
    let mut covered = vec![false; n];
    let mut allowed = vec![false; n];
    for i in 0..n {
        if covered[i] {
            continue;
        }
        allowed[i] = true;
        for j in (i + 1)..n {
            if covered[j] {
                continue;
            }
            if piece_classes[j] == piece_classes[i] || goal_classes[j] == goal_classes[i] {
                covered[j] = true;
            }
        }
    }
    allowed
}

/// Chooses the best symmetry-breaking piece among `candidates`, or `None` if
/// no candidate's reduction factor exceeds 1.
///
/// `candidates` must already be filtered to pieces with `count == {1, 1}` —
/// callers (the facade) exclude pieces with `min != max` or a count other
/// than exactly one before calling this, per §4.3's eligibility rule.
pub fn choose_symmetry_piece<G: Grid>(
    grid: &G,
    goal_voxels: &[G::Voxel],
    candidates: &[(PieceId, &Piece<G>, CountRange)],
    rotations: &[G::Transform],
) -> Option<SymmetryChoice<G>> {
    let goal_classes = rotation_classes(grid, goal_voxels, rotations);

    let mut best: Option<SymmetryChoice<G>> = None;
    for &(piece_id, piece, count) in candidates {
        if count.min != 1 || count.max != 1 {
            continue;
        }
        let piece_classes = rotation_classes(grid, &piece.voxels, rotations);
        let n_piece_classes = piece_classes.iter().enumerate().filter(|&(i, &c)| c == i).count();

        let mask = allowed_mask(&piece_classes, &goal_classes);
        let n_allowed = mask.iter().filter(|&&b| b).count();

        let reduction = n_piece_classes as f64 / n_allowed as f64;
        if reduction <= 1.0 {
            continue;
        }
        if best.as_ref().is_none_or(|b| reduction > b.reduction) {
            let allowed_rotations = rotations
                .iter()
                .zip(&mask)
                .filter_map(|(&r, &keep)| keep.then_some(r))
                .collect();
            best = Some(SymmetryChoice { piece_id, allowed_rotations, reduction });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use puzzle_core::Piece;
    use puzzle_util::ti::TypedIndex;

    use super::*;
    use crate::test_grid::{Grid2D, Voxel2D};

    #[test]
    fn unique_piece_in_symmetric_goal_reduces() {
        let grid = Grid2D;
        // 2x2 square goal: fully symmetric under the 8-element dihedral group.
        let goal = vec![Voxel2D(0, 0), Voxel2D(1, 0), Voxel2D(0, 1), Voxel2D(1, 1)];
        let rotations = grid.rotations(false);

        // An L-shaped tromino piece breaks orientation symmetry.
        let piece_id = puzzle_core::PieceId::try_from_index(1).unwrap();
        let piece = Piece::new(piece_id, vec![Voxel2D(0, 0), Voxel2D(1, 0), Voxel2D(0, 1)]);
        let candidates = vec![(piece_id, &piece, CountRange { min: 1, max: 1 })];

        let choice = choose_symmetry_piece(&grid, &goal, &candidates, &rotations);
        assert!(choice.is_some());
        assert!(choice.unwrap().reduction > 1.0);
    }

    #[test]
    fn ranged_count_piece_is_excluded_by_caller() {
        // choose_symmetry_piece itself defers to its `count` check even if a
        // caller forgets to pre-filter.
        let grid = Grid2D;
        let goal = vec![Voxel2D(0, 0), Voxel2D(1, 0)];
        let rotations = grid.rotations(false);
        let piece_id = puzzle_core::PieceId::try_from_index(1).unwrap();
        let piece = Piece::new(piece_id, vec![Voxel2D(0, 0)]);
        let candidates = vec![(piece_id, &piece, CountRange { min: 1, max: 2 })];
        assert!(choose_symmetry_piece(&grid, &goal, &candidates, &rotations).is_none());
    }
}
