//! Assembly solver facade (§4.5): the only entry point most callers need —
//! validates a [`Problem`] against a [`Puzzle`], expands placements, builds
//! and solves the cover matrix, reconstructs assemblies, and optionally
//! disassembles and dedupes them.

use std::collections::HashMap;

use puzzle_core::{
    Assembly, BugError, CountRange, Grid, Piece, PieceId, Problem, Puzzle, Solution, SolveError,
    TaskCallbacks,
};
use puzzle_util::ti::TypedIndex;

use crate::dlx::{ColumnRange, Matrix};
use crate::placement::enumerate_placements;
use crate::symmetry::choose_symmetry_piece;
use crate::{dedup, disassembler};

/// Solve-time limits and post-processing switches, separate from the
/// `Problem` itself since they govern *how* the solver runs rather than
/// *what* it solves (the same problem can be re-run with a bigger node
/// budget without re-describing the goal and pieces).
#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    /// Stop enumerating cover solutions after this many are found. `None`
    /// means enumerate every solution.
    pub max_solutions: Option<usize>,
    /// Node budget passed to the disassembler's non-separating search, per
    /// top-level call to [`disassembler::disassemble`]. Ignored if
    /// `Problem::disassemble` is unset.
    pub node_budget: usize,
    /// Whether to run the symmetric-assembly dedup pass (§4.8) on surviving
    /// solutions before renumbering.
    pub dedupe_symmetric_assemblies: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self { max_solutions: None, node_budget: 100_000, dedupe_symmetric_assemblies: false }
    }
}

/// Runs `problem` against `puzzle`: validates, solves, and post-processes,
/// returning the surviving solutions renumbered `1..N`.
pub fn solve<G: Grid>(
    puzzle: &Puzzle<G>,
    problem: &Problem,
    config: &SolveConfig,
    callbacks: &mut TaskCallbacks,
) -> Result<Vec<Solution<G>>, SolveError> {
    callbacks.log(log::Level::Info, &format!("validating problem {:?}", problem.label));
    validate(puzzle, problem)?;

    callbacks.progress(0.0, Some("placement"));
    let rotations_all = puzzle.grid.rotations(problem.symmetry_reduction.include_mirrors());
    let goal = puzzle.piece(problem.goal_piece_id).expect("validated above");

    let symmetry_choice = if problem.symmetry_reduction.is_enabled() {
        let candidates: Vec<(PieceId, &Piece<G>, CountRange)> = problem
            .used_piece_counts
            .iter()
            .filter_map(|(&id, &count)| puzzle.piece(id).map(|p| (id, p, count)))
            .collect();
        choose_symmetry_piece(&puzzle.grid, &goal.voxels, &candidates, &rotations_all)
    } else {
        None
    };
    if let Some(choice) = &symmetry_choice {
        callbacks.log(
            log::Level::Debug,
            &format!(
                "symmetry-breaking piece {:?}, reduction {:.2}x",
                choice.piece_id, choice.reduction
            ),
        );
    }

    // piece_id -> placements, in insertion (problem iteration) order.
    use itertools::Itertools as _;
    let mut placements_by_piece: Vec<(PieceId, Vec<Piece<G>>)> = Vec::new();
    let piece_ids = problem.used_piece_counts.keys().copied().sorted_by_key(|id| id.to_index());
    for piece_id in piece_ids {
        let piece = puzzle.piece(piece_id).expect("validated above");
        let rotations = match &symmetry_choice {
            Some(choice) if choice.piece_id == piece_id => &choice.allowed_rotations,
            _ => &rotations_all,
        };
        let placements = enumerate_placements(&puzzle.grid, &goal.voxels, piece, rotations);
        if placements.is_empty() {
            return Err(SolveError::PieceUnplaceable {
                piece_id,
                label: piece.label.clone().unwrap_or_else(|| piece_id.to_index().to_string()),
            });
        }
        placements_by_piece.push((piece_id, placements));
    }

    callbacks.progress(20.0, Some("cover-matrix"));
    let built = build_matrix(&puzzle.grid, goal, &problem.used_piece_counts, &placements_by_piece);

    callbacks.progress(40.0, Some("cover-search"));
    let mut raw_solutions = built.matrix.solve();
    if let Some(max) = config.max_solutions {
        raw_solutions.truncate(max);
    }
    callbacks.log(log::Level::Info, &format!("{} cover solution(s) found", raw_solutions.len()));

    callbacks.progress(60.0, Some("reconstruction"));
    let mut solutions: Vec<Solution<G>> = Vec::new();
    for rows in raw_solutions {
        let assembly = reconstruct_assembly(&built, &rows);
        solutions.push(Solution::new(0, assembly));
    }

    if problem.disassemble {
        callbacks.progress(80.0, Some("disassembly"));
        for solution in &mut solutions {
            let outcome = disassembler::disassemble(&puzzle.grid, &solution.placements, config.node_budget);
            let mut disassemblies = Vec::new();
            if let Some(mut d) = outcome.into_option() {
                if disassembler::space_separated_parts(&puzzle.grid, &solution.placements, &mut d).is_ok() {
                    disassemblies.push(d);
                }
            }
            solution.disassemblies = Some(disassemblies);
        }
        if problem.remove_no_disassembly {
            solutions.retain(Solution::survives_no_disassembly_filter);
        }
    }

    if config.dedupe_symmetric_assemblies {
        solutions = dedup::dedup_symmetric_assemblies(
            &puzzle.grid,
            solutions,
            problem.symmetry_reduction.include_mirrors(),
        );
    }

    for (idx, solution) in solutions.iter_mut().enumerate() {
        solution.id = idx as u32 + 1;
    }

    callbacks.progress(100.0, Some("done"));
    Ok(solutions)
}

fn validate<G: Grid>(puzzle: &Puzzle<G>, problem: &Problem) -> Result<(), SolveError> {
    let Some(goal) = puzzle.piece(problem.goal_piece_id) else {
        return Err(SolveError::GoalMissing { goal_id: problem.goal_piece_id });
    };
    if goal.voxels.is_empty() {
        return Err(SolveError::GoalEmpty);
    }
    if problem.used_piece_counts.is_empty() {
        return Err(SolveError::NoPieces);
    }
    for (&piece_id, _) in &problem.used_piece_counts {
        if piece_id == problem.goal_piece_id {
            continue;
        }
        if let Some(piece) = puzzle.piece(piece_id) {
            if piece.voxel_attributes.contains_key(puzzle_core::piece::OPTIONAL_ATTRIBUTE) {
                return Err(SolveError::OptionalOnNonGoal {
                    label: piece.label.clone().unwrap_or_else(|| piece_id.to_index().to_string()),
                });
            }
        }
    }

    let required_voxels = goal.voxels.iter().filter(|&&v| !goal.is_optional(v)).count();
    let optional_voxels = goal.voxels.len() - required_voxels;
    let (mut min_possible, mut max_possible) = (0usize, 0usize);
    for (&piece_id, &count) in &problem.used_piece_counts {
        let Some(piece) = puzzle.piece(piece_id) else { continue };
        min_possible += piece.voxels.len() * count.min as usize;
        max_possible += piece.voxels.len() * count.max as usize;
    }
    let goal_voxels = required_voxels + optional_voxels;
    let range_possible = min_possible..=max_possible.max(min_possible);
    let goal_range = required_voxels..=goal_voxels;
    let overlaps = range_possible.contains(goal_range.start())
        || range_possible.contains(goal_range.end())
        || goal_range.contains(range_possible.start());
    if !overlaps {
        return Err(SolveError::VoxelCountMismatch {
            goal_voxels,
            min_possible,
            max_possible,
        });
    }
    Ok(())
}

/// The cover matrix plus enough bookkeeping to map a solved row set back to
/// an [`Assembly`].
struct BuiltMatrix<G: Grid> {
    matrix: Matrix,
    /// Per-row: the piece id and the exact placement it contributes.
    row_info: Vec<(PieceId, Piece<G>)>,
    /// Piece ids whose column allows more than one instance, and therefore
    /// need an instance counter assigned during reconstruction.
    multi_instance: HashMap<PieceId, ()>,
}

fn build_matrix<G: Grid>(
    grid: &G,
    goal: &Piece<G>,
    used_piece_counts: &HashMap<PieceId, CountRange>,
    placements_by_piece: &[(PieceId, Vec<Piece<G>>)],
) -> BuiltMatrix<G> {
    let mut piece_ids: Vec<PieceId> = placements_by_piece.iter().map(|(id, _)| *id).collect();
    piece_ids.sort_by_key(|id| id.to_index());

    let mut piece_column: HashMap<PieceId, usize> = HashMap::new();
    let mut ranges: Vec<ColumnRange> = Vec::new();
    let mut multi_instance = HashMap::new();
    for &piece_id in &piece_ids {
        let count = used_piece_counts[&piece_id];
        piece_column.insert(piece_id, ranges.len());
        ranges.push(ColumnRange { min: count.min, max: count.max });
        if count.max > 1 {
            multi_instance.insert(piece_id, ());
        }
    }

    let mut voxel_column: HashMap<G::Voxel, usize> = HashMap::new();
    for &v in &goal.voxels {
        voxel_column.insert(v, ranges.len());
        ranges.push(if goal.is_optional(v) {
            ColumnRange::optional_at_most_one()
        } else {
            ColumnRange::exactly_one()
        });
    }
    let _ = grid;

    let mut row_columns: Vec<Vec<usize>> = Vec::new();
    let mut row_info: Vec<(PieceId, Piece<G>)> = Vec::new();
    for (piece_id, placements) in placements_by_piece {
        let pcol = piece_column[piece_id];
        for placement in placements {
            let mut cols = vec![pcol];
            cols.extend(placement.voxels.iter().map(|v| voxel_column[v]));
            row_columns.push(cols);
            row_info.push((*piece_id, placement.clone()));
        }
    }

    BuiltMatrix { matrix: Matrix::new(ranges, row_columns), row_info, multi_instance }
}

fn reconstruct_assembly<G: Grid>(built: &BuiltMatrix<G>, rows: &[usize]) -> Assembly<G> {
    let mut instance_counters: HashMap<PieceId, u16> = HashMap::new();
    let mut pieces = Vec::with_capacity(rows.len());
    for &row in rows {
        let Some((piece_id, placement)) = built.row_info.get(row) else {
            // Every row index a cover solution returns came from this same
            // matrix, so `row_info` (built with one entry per row) always
            // has an entry for it; see `BugError::MultiplePiecesInRow`.
            puzzle_core::debug_panic!(
                "{}",
                BugError::MultiplePiecesInRow { row_index: row, pieces_found: 0 }
            );
            continue;
        };
        let mut piece = placement.clone();
        if built.multi_instance.contains_key(piece_id) {
            let counter = instance_counters.entry(*piece_id).or_insert(0);
            piece.instance = Some(*counter);
            *counter += 1;
        }
        pieces.push(piece);
    }
    Assembly::from_pieces(pieces)
}
