//! Symmetric-assembly deduplication (§4.8): drop solutions that are the same
//! assembly up to a grid symmetry, keeping the first of each equivalence
//! class in input order.

use std::collections::HashSet;

use puzzle_core::{Grid, Piece, Solution};

/// Canonical string for one assembly layout: each piece's voxels rendered
/// via `Debug` and sorted, pieces then sorted by their own sorted voxel
/// list, joined by newlines. Doesn't require `Ord` on `G::Voxel` — `Debug`
/// output is enough to get a total, stable order, same trick
/// `disassembler::state_hash` uses for its visited-state dedup.
fn canonical_form<G: Grid>(pieces: &[Piece<G>]) -> String {
    let mut per_piece: Vec<String> = pieces
        .iter()
        .map(|p| {
            let mut tokens: Vec<String> = p.voxels.iter().map(|v| format!("{v:?}")).collect();
            tokens.sort_unstable();
            tokens.join(";")
        })
        .collect();
    per_piece.sort_unstable();
    per_piece.join("\n")
}

/// The canonical forms of every symmetric image of `pieces`: for each grid
/// rotation, apply it to every piece, then translate the result back onto
/// `pieces`'s own bounding box (valid because every solution to the same
/// problem fills the identical goal footprint, so "translate to a shared
/// origin" reduces to "translate back to where we started").
fn symmetric_forms<G: Grid>(grid: &G, pieces: &[Piece<G>], rotations: &[G::Transform]) -> HashSet<String> {
    let all_voxels: Vec<G::Voxel> = pieces.iter().flat_map(|p| p.voxels.iter().copied()).collect();
    let target_origin = grid.bounds_origin(&grid.voxel_bounds(&all_voxels));

    rotations
        .iter()
        .map(|&r| {
            let rotated: Vec<Piece<G>> =
                pieces.iter().map(|p| p.with_voxels(grid.apply_transform(r, &p.voxels))).collect();
            let rotated_voxels: Vec<G::Voxel> =
                rotated.iter().flat_map(|p| p.voxels.iter().copied()).collect();
            let rotated_origin = grid.bounds_origin(&grid.voxel_bounds(&rotated_voxels));
            let t = grid.translation(rotated_origin, target_origin);
            let normalized: Vec<Piece<G>> =
                rotated.iter().map(|p| p.with_voxels(grid.apply_transform(t, &p.voxels))).collect();
            canonical_form(&normalized)
        })
        .collect()
}

/// Filters `solutions`, keeping the first occurrence of each symmetry class
/// and dropping the rest, preserving relative order of survivors.
///
/// `include_mirrors` should match the problem's
/// [`puzzle_core::SymmetryReduction::include_mirrors`] so dedup and the
/// placement-time symmetry reduction agree on what counts as "the same"
/// assembly.
pub fn dedup_symmetric_assemblies<G: Grid>(
    grid: &G,
    solutions: Vec<Solution<G>>,
    include_mirrors: bool,
) -> Vec<Solution<G>> {
    let rotations = grid.rotations(include_mirrors);
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for solution in solutions {
        let forms = symmetric_forms(grid, &solution.placements, &rotations);
        if forms.iter().any(|f| seen.contains(f)) {
            continue;
        }
        seen.extend(forms);
        out.push(solution);
    }
    out
}

#[cfg(test)]
mod tests {
    use puzzle_core::{Assembly, Piece, PieceId};
    use puzzle_util::ti::TypedIndex;

    use super::*;
    use crate::test_grid::{Grid2D, Voxel2D};

    fn pid(n: u16) -> PieceId {
        PieceId::try_from_index(n).unwrap()
    }

    #[test]
    fn rotated_duplicate_is_dropped() {
        let grid = Grid2D;
        // Two horizontal dominoes tiling a 2x2 square; rotating 90 degrees
        // gives the vertical-dominoes tiling, a distinct solution, but a
        // further 180 degree rotation of the horizontal tiling reproduces
        // itself exactly (the 2x2 square is centrally symmetric).
        let horizontal = Assembly::from_pieces(vec![
            Piece::new(pid(0), vec![Voxel2D(0, 0), Voxel2D(1, 0)]),
            Piece::new(pid(0), vec![Voxel2D(0, 1), Voxel2D(1, 1)]),
        ]);
        let vertical = Assembly::from_pieces(vec![
            Piece::new(pid(0), vec![Voxel2D(0, 0), Voxel2D(0, 1)]),
            Piece::new(pid(0), vec![Voxel2D(1, 0), Voxel2D(1, 1)]),
        ]);

        let solutions = vec![Solution::new(1, horizontal), Solution::new(2, vertical)];
        let deduped = dedup_symmetric_assemblies(&grid, solutions, false);
        // horizontal and vertical are related by a 90 degree rotation, so
        // only one should survive.
        assert_eq!(deduped.len(), 1);
    }

    #[test]
    fn distinct_assemblies_both_survive() {
        let grid = Grid2D;
        let a = Assembly::from_pieces(vec![Piece::new(pid(0), vec![Voxel2D(0, 0)])]);
        let b = Assembly::from_pieces(vec![Piece::new(pid(0), vec![Voxel2D(5, 5)])]);
        let solutions = vec![Solution::new(1, a), Solution::new(2, b)];
        let deduped = dedup_symmetric_assemblies(&grid, solutions, false);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn cube_symmetries_collapse_to_one_canonical_assembly() {
        use puzzle_grid_cubic::{CubicGrid, CubicVoxel};

        let grid = CubicGrid;
        // Three distinct unit-cube pieces forming a straight 3-cell bar
        // along the x axis.
        let base = vec![
            Piece::new(pid(0), vec![CubicVoxel(0, 0, 0)]),
            Piece::new(pid(1), vec![CubicVoxel(1, 0, 0)]),
            Piece::new(pid(2), vec![CubicVoxel(2, 0, 0)]),
        ];

        let rotations = grid.rotations(true);
        assert_eq!(rotations.len(), 48);

        let solutions: Vec<Solution<CubicGrid>> = rotations
            .iter()
            .enumerate()
            .map(|(i, &r)| {
                let rotated =
                    base.iter().map(|p| p.with_voxels(grid.apply_transform(r, &p.voxels))).collect();
                Solution::new(i as u32 + 1, Assembly::from_pieces(rotated))
            })
            .collect();

        // Every one of the 48 cube symmetries applied to the same base
        // assembly lands in the same equivalence class, so deduping with the
        // full 48-element group must collapse them all to one.
        let deduped = dedup_symmetric_assemblies(&grid, solutions, true);
        assert_eq!(deduped.len(), 1);
    }
}
