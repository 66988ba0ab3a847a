//! Disassembler (§4.7): depth-first search over assembly states, reusing the
//! movement enumerator, producing a [`Disassembly`] tree; plus the "space
//! separated parts" pass that inflates `repeat` counts so visual playback
//! never shows two parts touching.

use std::collections::HashSet;

use puzzle_core::{Assembly, BugError, Disassembly, DisassemblyStep, Grid, Piece};

use crate::movement::{enumerate_movements, Movement};

/// Outcome of a disassembly search: either a full disassembly, or
/// "inconclusive" — the node budget ran out before every branch reached a
/// terminal (single-piece) state, which is distinct from "definitely cannot
/// be disassembled" (§9's open question on bounding cyclic search).
pub enum DisassemblyOutcome<G: Grid> {
    /// A disassembly was found.
    Found(Disassembly<G>),
    /// The search exhausted its node budget without finding one.
    Inconclusive,
}

impl<G: Grid> DisassemblyOutcome<G> {
    /// Returns the found disassembly, if any (treats `Inconclusive` as "no
    /// disassembly found", matching the non-error "no-disassembly" case in
    /// §7 for callers that don't care about the distinction).
    pub fn into_option(self) -> Option<Disassembly<G>> {
        match self {
            Self::Found(d) => Some(d),
            Self::Inconclusive => None,
        }
    }
}

/// Canonicalised hash of an assembly's voxel layout, used to dedupe visited
/// states during the non-separating breadth-first search: bounds-origin
/// normalised, voxels sorted per piece (by insertion order hash, since
/// [`Grid::Voxel`] isn't required to implement `Ord`), pieces sorted by
/// complete id, joined into one string.
fn state_hash<G: Grid>(grid: &G, pieces: &[Piece<G>]) -> String {
    let mut per_piece: Vec<(String, Vec<String>)> = pieces
        .iter()
        .map(|p| {
            let mut tokens: Vec<String> = p.voxels.iter().map(|v| format!("{v:?}")).collect();
            tokens.sort_unstable();
            (p.complete_id(), tokens)
        })
        .collect();
    per_piece.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    per_piece
        .into_iter()
        .map(|(id, tokens)| format!("{id}:{}", tokens.join(",")))
        .collect::<Vec<_>>()
        .join(";")
}

struct SearchState<G: Grid> {
    pieces: Vec<Piece<G>>,
    path: Vec<DisassemblyStep<G>>,
}

/// Runs the disassembly search on `assembly`, bounded by `node_budget` nodes
/// of non-separating exploration (shared across the whole recursive search).
pub fn disassemble<G: Grid>(
    grid: &G,
    assembly: &Assembly<G>,
    node_budget: usize,
) -> DisassemblyOutcome<G> {
    let mut budget = node_budget;
    match disassemble_inner(grid, assembly, &mut budget) {
        Some(steps) => DisassemblyOutcome::Found(Disassembly::new(steps)),
        None => DisassemblyOutcome::Inconclusive,
    }
}

fn disassemble_inner<G: Grid>(
    grid: &G,
    assembly: &Assembly<G>,
    budget: &mut usize,
) -> Option<Vec<DisassemblyStep<G>>> {
    if assembly.is_terminal() {
        return Some(Vec::new());
    }

    let start_pieces: Vec<Piece<G>> = assembly.iter().cloned().collect();
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(state_hash(grid, &start_pieces));

    let mut queue: std::collections::VecDeque<SearchState<G>> = std::collections::VecDeque::new();
    queue.push_back(SearchState { pieces: start_pieces, path: Vec::new() });

    while let Some(SearchState { pieces, path }) = queue.pop_front() {
        if *budget == 0 {
            return None;
        }
        *budget -= 1;

        let current = Assembly::from_pieces(pieces.clone());
        let movements = enumerate_movements(grid, &current);

        let mut separating: Vec<&Movement<G>> = movements.iter().filter(|m| m.separates).collect();
        separating.sort_by(|a, b| a.moved_pieces.cmp(&b.moved_pieces));

        for movement in separating {
            if let Some(steps) = try_split(grid, &path, movement, budget) {
                return Some(steps);
            }
        }

        for movement in movements.iter().filter(|m| !m.separates) {
            let next_pieces: Vec<Piece<G>> = movement.placements.iter().cloned().collect();
            let hash = state_hash(grid, &next_pieces);
            if visited.insert(hash) {
                let mut next_path = path.clone();
                next_path.push(DisassemblyStep {
                    moved_pieces: movement.moved_pieces.clone(),
                    transform: movement.transform,
                    repeat: movement.repeat,
                    separates: false,
                });
                queue.push_back(SearchState { pieces: next_pieces, path: next_path });
            }
        }
    }

    None
}

/// Attempts to complete a disassembly by committing to `movement` (which
/// separates its moved group from the rest) and recursing into both
/// resulting sub-assemblies. Returns the full step list (the path leading to
/// this state, the separating step, then each sub-assembly's steps) if both
/// halves disassemble.
fn try_split<G: Grid>(
    grid: &G,
    path: &[DisassemblyStep<G>],
    movement: &Movement<G>,
    budget: &mut usize,
) -> Option<Vec<DisassemblyStep<G>>> {
    let all_pieces: Vec<Piece<G>> = movement.placements.iter().cloned().collect();
    let (group, rest): (Vec<Piece<G>>, Vec<Piece<G>>) = all_pieces
        .into_iter()
        .partition(|p| movement.moved_pieces.contains(&p.complete_id()));

    let group_assembly = Assembly::from_pieces(group);
    let rest_assembly = Assembly::from_pieces(rest);

    let group_steps = disassemble_inner(grid, &group_assembly, budget)?;
    let rest_steps = disassemble_inner(grid, &rest_assembly, budget)?;

    let mut steps = path.to_vec();
    steps.push(DisassemblyStep {
        moved_pieces: movement.moved_pieces.clone(),
        transform: movement.transform,
        repeat: movement.repeat,
        separates: true,
    });
    steps.extend(group_steps);
    steps.extend(rest_steps);
    Some(steps)
}

/// A logically independent group of pieces during the "space separated
/// parts" replay, tracked by the chain of separating-step indices that
/// carved it out of the original assembly (its ancestry in the split tree).
struct Part {
    piece_indices: Vec<usize>,
    history: Vec<usize>,
}

/// Re-plays `disassembly`'s steps against `start`, inflating `repeat` counts
/// wherever two logically-separated parts would visually touch, so that
/// movie-style playback never shows two parts overlapping or adjacent.
///
/// Bounded by `nPieces · (totalVoxels + 2·nPieces)` restarts (§4.7); exceeding
/// that without reaching a collision-free replay is a [`BugError`].
pub fn space_separated_parts<G: Grid>(
    grid: &G,
    start: &Assembly<G>,
    disassembly: &mut Disassembly<G>,
) -> Result<(), BugError> {
    let n = start.len();
    let total_voxels = start.voxel_count();
    let max_iters = (n * (total_voxels + 2 * n)).max(1);

    let mut last_collision = (0, 0);
    for _ in 0..max_iters {
        match replay_once(grid, start, disassembly) {
            ReplayResult::Clean => return Ok(()),
            ReplayResult::Collision { sep_step, part_a, part_b } => {
                disassembly.steps[sep_step].repeat += 1;
                last_collision = (part_a, part_b);
            }
        }
    }

    let (part_a, part_b) = last_collision;
    puzzle_core::debug_panic!(
        "space-separated-parts pass did not converge within {max_iters} iterations \
         (last collision between parts {part_a} and {part_b})"
    );
    Err(BugError::SeparationNotFound { part_a, part_b })
}

enum ReplayResult {
    Clean,
    Collision { sep_step: usize, part_a: usize, part_b: usize },
}

fn replay_once<G: Grid>(
    grid: &G,
    start: &Assembly<G>,
    disassembly: &Disassembly<G>,
) -> ReplayResult {
    let mut pieces: Vec<Piece<G>> = start.iter().cloned().collect();
    let mut parts: Vec<Part> =
        vec![Part { piece_indices: (0..pieces.len()).collect(), history: Vec::new() }];

    for (step_idx, step) in disassembly.steps.iter().enumerate() {
        let moved_indices: Vec<usize> = step
            .moved_pieces
            .iter()
            .map(|cid| {
                pieces
                    .iter()
                    .position(|p| &p.complete_id() == cid)
                    .expect("disassembly step references a piece present in the assembly")
            })
            .collect();

        for _ in 0..step.repeat {
            for &idx in &moved_indices {
                pieces[idx] = pieces[idx].with_voxels(grid.apply_transform(step.transform, &pieces[idx].voxels));
            }
        }

        if step.separates {
            let part_idx = parts
                .iter()
                .position(|p| p.piece_indices.contains(&moved_indices[0]))
                .expect("separating step's group must lie within an existing part");
            let old = parts.remove(part_idx);
            let (group_indices, rest_indices): (Vec<usize>, Vec<usize>) = old
                .piece_indices
                .into_iter()
                .partition(|idx| moved_indices.contains(idx));
            let mut new_history = old.history;
            new_history.push(step_idx);
            parts.push(Part { piece_indices: group_indices, history: new_history.clone() });
            if !rest_indices.is_empty() {
                parts.push(Part { piece_indices: rest_indices, history: new_history });
            }
        }

        for a in 0..parts.len() {
            for b in (a + 1)..parts.len() {
                let va: Vec<G::Voxel> =
                    parts[a].piece_indices.iter().flat_map(|&i| pieces[i].voxels.iter().copied()).collect();
                let vb: Vec<G::Voxel> =
                    parts[b].piece_indices.iter().flat_map(|&i| pieces[i].voxels.iter().copied()).collect();
                if !grid.is_separate(&va, &vb) {
                    let sep_step = latest_common_separation(&parts[a].history, &parts[b].history);
                    return ReplayResult::Collision { sep_step, part_a: a, part_b: b };
                }
            }
        }
    }

    ReplayResult::Clean
}

/// The last step index common to both histories' prefixes — the split that
/// carved these two parts apart from a shared ancestor.
fn latest_common_separation(a: &[usize], b: &[usize]) -> usize {
    let mut last = None;
    for (x, y) in a.iter().zip(b) {
        if x == y {
            last = Some(*x);
        } else {
            break;
        }
    }
    last.expect("colliding parts must share at least one ancestor separation event")
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
    fn single_piece_assembly_is_already_terminal() {
        let grid = Grid2D;
        let assembly = Assembly::from_pieces(vec![Piece::new(pid(0), vec![Voxel2D(0, 0)])]);
        match disassemble(&grid, &assembly, 1000) {
            DisassemblyOutcome::Found(d) => assert_eq!(d.steps.len(), 0),
            DisassemblyOutcome::Inconclusive => panic!("expected a trivial disassembly"),
        }
    }

    #[test]
    fn frame_and_inner_piece_disassemble_in_two_moves() {
        // One cell below the gap at (1,3): moving the inner piece up twice
        // walks it through the gap and separates it from the frame.
        let grid = Grid2D;
        let frame_voxels: Vec<Voxel2D> = (0..4)
            .flat_map(|x| (0..4).map(move |y| Voxel2D(x, y)))
            .filter(|v| !(v.0 == 1 && v.1 == 3))
            .filter(|v| !(v.0 == 1 && v.1 == 2))
            .collect();
        let frame = Piece::new(pid(0), frame_voxels);
        let inner = Piece::new(pid(1), vec![Voxel2D(1, 2)]);
        let assembly = Assembly::from_pieces(vec![frame, inner]);

        match disassemble(&grid, &assembly, 10_000) {
            DisassemblyOutcome::Found(d) => {
                // Both the inner piece (moving up through the gap) and the
                // frame (moving down away from it) separate in exactly two
                // moves; the search commits to whichever sorts first by
                // moved-piece id, but either way it's a single two-move step.
                let separating = d.steps.iter().find(|s| s.separates);
                assert!(separating.is_some(), "expected a separating step");
                let separating = separating.unwrap();
                assert_eq!(separating.repeat, 2);
                assert_eq!(separating.moved_pieces.len(), 1);
            }
            DisassemblyOutcome::Inconclusive => panic!("expected a disassembly"),
        }
    }

    #[test]
    fn replay_applies_every_step_leaving_pieces_separate() {
        let grid = Grid2D;
        let frame_voxels: Vec<Voxel2D> = (0..4)
            .flat_map(|x| (0..4).map(move |y| Voxel2D(x, y)))
            .filter(|v| !(v.0 == 1 && v.1 == 3))
            .filter(|v| !(v.0 == 1 && v.1 == 2))
            .collect();
        let frame = Piece::new(pid(0), frame_voxels);
        let inner = Piece::new(pid(1), vec![Voxel2D(1, 2)]);
        let assembly = Assembly::from_pieces(vec![frame, inner]);

        let Some(mut disassembly) = disassemble(&grid, &assembly, 10_000).into_option() else {
            panic!("expected a disassembly");
        };
        space_separated_parts(&grid, &assembly, &mut disassembly).expect("should converge");

        let mut pieces: Vec<Piece<Grid2D>> = assembly.iter().cloned().collect();
        for step in &disassembly.steps {
            let idxs: Vec<usize> = step
                .moved_pieces
                .iter()
                .map(|cid| pieces.iter().position(|p| &p.complete_id() == cid).unwrap())
                .collect();
            for _ in 0..step.repeat {
                for &i in &idxs {
                    pieces[i] = pieces[i].with_voxels(grid.apply_transform(step.transform, &pieces[i].voxels));
                }
            }
        }
        assert!(grid.is_separate(&pieces[0].voxels, &pieces[1].voxels));
    }
}
