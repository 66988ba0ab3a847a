//! Movement enumerator (§4.6): every single-step rigid movement of a subset
//! of an assembly's pieces by one disassembly transform, growing the moving
//! group on demand when it would otherwise overlap the rest of the assembly.

use std::collections::HashSet;

use puzzle_core::{Assembly, Grid, Piece};

/// One candidate movement: move `moved_pieces` by `transform`, `repeat`
/// times, landing in `placements`. `separates` mirrors
/// [`Grid::is_separate`] between the moved group and the rest.
pub struct Movement<G: Grid> {
    /// Complete ids of the pieces moved together.
    pub moved_pieces: Vec<String>,
    /// The transform applied.
    pub transform: G::Transform,
    /// The assembly after applying `transform` to `moved_pieces`, `repeat`
    /// times.
    pub placements: Assembly<G>,
    /// How many times `transform` was applied.
    pub repeat: u32,
    /// Whether the moved group is now grid-separate from the rest.
    pub separates: bool,
}

impl<G: Grid> Clone for Movement<G> {
    fn clone(&self) -> Self {
        Self {
            moved_pieces: self.moved_pieces.clone(),
            transform: self.transform,
            placements: self.placements.clone(),
            repeat: self.repeat,
            separates: self.separates,
        }
    }
}

/// Enumerates every movement reachable from `assembly` by moving a starting
/// piece (and whatever it drags along) by one of the grid's disassembly
/// transforms.
pub fn enumerate_movements<G: Grid>(grid: &G, assembly: &Assembly<G>) -> Vec<Movement<G>> {
    let transforms = grid.disassembly_transforms();
    let k = assembly.len();
    if k <= 1 {
        return Vec::new();
    }
    let max_group = k.div_ceil(2);

    let mut out = Vec::new();
    for start in 0..k {
        for &t in &transforms {
            if let Some(sequence) = try_movement(grid, assembly, start, t, max_group) {
                out.extend(sequence);
            }
        }
    }
    out
}

/// Iteration safety net for grids where a movement direction never separates
/// and never grows the group (shouldn't happen for any well-formed puzzle;
/// mirrors the bound used by the "space separated parts" pass in §4.7).
fn iteration_cap<G: Grid>(assembly: &Assembly<G>) -> u32 {
    let n = assembly.len() as u32;
    let voxels = assembly.voxel_count() as u32;
    n.saturating_mul(voxels + 2 * n).max(64)
}

fn try_movement<G: Grid>(
    grid: &G,
    assembly: &Assembly<G>,
    start: usize,
    t: G::Transform,
    max_group: usize,
) -> Option<Vec<Movement<G>>> {
    let k = assembly.len();
    let mut group: Vec<usize> = vec![start];
    let mut copy: Vec<Piece<G>> = assembly.iter().cloned().collect();
    let mut repeat: u32 = 0;
    let mut results = Vec::new();
    let cap = iteration_cap(assembly);

    loop {
        repeat += 1;
        if repeat > cap {
            return None;
        }

        for &idx in &group {
            copy[idx] = copy[idx].with_voxels(grid.apply_transform(t, &copy[idx].voxels));
        }

        loop {
            let moved_voxels: HashSet<G::Voxel> =
                group.iter().flat_map(|&idx| copy[idx].voxels.iter().copied()).collect();
            let newly_added: Vec<usize> = (0..k)
                .filter(|idx| !group.contains(idx))
                .filter(|&idx| copy[idx].voxels.iter().any(|v| moved_voxels.contains(v)))
                .collect();
            if newly_added.is_empty() {
                break;
            }
            // "only allow growing the group at repeat = 1 to keep outputs
            // canonical" (§4.6 step 3).
            if repeat > 1 {
                return None;
            }
            for &idx in &newly_added {
                copy[idx] = copy[idx].with_voxels(grid.apply_transform(t, &copy[idx].voxels));
            }
            group.extend(newly_added);
        }

        if group.len() > max_group {
            return None;
        }

        let group_voxels: Vec<G::Voxel> =
            group.iter().flat_map(|&idx| copy[idx].voxels.iter().copied()).collect();
        let other_voxels: Vec<G::Voxel> = (0..k)
            .filter(|idx| !group.contains(idx))
            .flat_map(|idx| copy[idx].voxels.iter().copied())
            .collect();
        let separates = grid.is_separate(&group_voxels, &other_voxels);

        let moved_pieces = group.iter().map(|&idx| assembly[idx].complete_id()).collect();
        results.push(Movement {
            moved_pieces,
            transform: t,
            placements: Assembly::from_pieces(copy.clone()),
            repeat,
            separates,
        });

        if separates {
            return Some(results);
        }
    }
}

#[cfg(test)]
mod tests {
    use puzzle_core::{Piece, PieceId};
    use puzzle_util::ti::TypedIndex;

    use super::*;
    use crate::test_grid::{Grid2D, Voxel2D};

    fn pid(n: u16) -> PieceId {
        PieceId::try_from_index(n).unwrap()
    }

    #[test]
    fn inner_piece_separates_after_two_moves() {
        // A 4x4 frame with a gap at the top, and a single interior piece one
        // cell below the gap. Moving it up by 1 then again separates it.
        let grid = Grid2D;
        let frame_voxels: Vec<Voxel2D> = (0..4)
            .flat_map(|x| (0..4).map(move |y| Voxel2D(x, y)))
            .filter(|v| !(v.0 == 1 && v.1 == 3)) // gap for the inner piece to escape through
            .filter(|v| !(v.0 == 1 && v.1 == 2)) // where the inner piece starts
            .collect();
        let frame = Piece::new(pid(0), frame_voxels);
        let inner = Piece::new(pid(1), vec![Voxel2D(1, 2)]);
        let assembly = Assembly::from_pieces(vec![frame, inner]);

        let movements = enumerate_movements(&grid, &assembly);
        let up = translate_up();
        let inner_moves: Vec<&Movement<Grid2D>> = movements
            .iter()
            .filter(|m| m.moved_pieces == vec!["1".to_string()] && m.transform == up)
            .collect();
        assert_eq!(inner_moves.len(), 2);
        assert!(!inner_moves[0].separates);
        assert!(inner_moves[1].separates);
        assert_eq!(inner_moves[1].repeat, 2);
    }

    fn translate_up() -> crate::test_grid::Transform2D {
        crate::test_grid::Transform2D::Translate(0, 1)
    }

    #[test]
    fn group_grows_when_pieces_push_each_other() {
        // Two interior pieces stacked so moving the bottom one pushes the
        // top one; both escape through a gap together.
        let grid = Grid2D;
        let frame_voxels: Vec<Voxel2D> = (0..4)
            .flat_map(|x| (0..4).map(move |y| Voxel2D(x, y)))
            .filter(|v| !(v.0 == 1 && v.1 == 3))
            .filter(|v| !(v.0 == 1 && (v.1 == 1 || v.1 == 2)))
            .collect();
        let frame = Piece::new(pid(0), frame_voxels);
        let bottom = Piece::new(pid(1), vec![Voxel2D(1, 1)]);
        let top = Piece::new(pid(2), vec![Voxel2D(1, 2)]);
        let assembly = Assembly::from_pieces(vec![frame, bottom, top]);

        let movements = enumerate_movements(&grid, &assembly);
        let up = translate_up();
        let grown = movements
            .iter()
            .find(|m| m.transform == up && m.moved_pieces.len() == 2 && m.repeat == 1);
        assert!(grown.is_some(), "expected a repeat=1 movement growing the group to both pieces");
    }
}
