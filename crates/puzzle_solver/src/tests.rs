//! End-to-end scenarios spanning placement, cover-solving, and optional
//! goal voxels, exercised through [`facade::solve`] rather than any one
//! module in isolation.

use puzzle_core::{Piece, PieceId, Problem, Puzzle, TaskCallbacks};
use puzzle_util::ti::TypedIndex;

use crate::facade::{solve, SolveConfig};
use crate::test_grid::{Grid2D, Voxel2D};

fn pid(n: u16) -> PieceId {
    PieceId::try_from_index(n).unwrap()
}

#[test]
fn single_piece_trivial_solve_has_one_solution_and_no_disassembly_work() {
    let grid = Grid2D;
    let mut puzzle = Puzzle::new(grid);
    let goal_voxels = vec![Voxel2D(0, 0), Voxel2D(0, 1), Voxel2D(1, 1)];
    let goal_id = puzzle.push_piece(Piece::new(pid(0), goal_voxels.clone())).unwrap();
    let piece_id = puzzle.push_piece(Piece::new(pid(0), goal_voxels)).unwrap();

    let mut problem = Problem::new("single piece", goal_id).with_piece_count(piece_id, 1);
    problem.disassemble = true;
    let config = SolveConfig::default();
    let mut callbacks = TaskCallbacks::new();
    let solutions = solve(&puzzle, &problem, &config, &mut callbacks).unwrap();

    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].placements.len(), 1);
    let disassemblies = solutions[0].disassemblies.as_ref().expect("disassembly was requested");
    assert_eq!(disassemblies.len(), 1);
    assert!(disassemblies[0].steps.is_empty(), "a single-piece assembly is already terminal");
}

#[test]
fn optional_goal_voxels_accept_partial_coverage() {
    let grid = Grid2D;
    let mut puzzle = Puzzle::new(grid);

    let mut goal = Piece::new(pid(0), vec![Voxel2D(0, 0), Voxel2D(1, 0)]);
    goal.voxel_attributes
        .entry(puzzle_core::piece::OPTIONAL_ATTRIBUTE.to_string())
        .or_default()
        .insert(Voxel2D(1, 0), true);
    let goal_id = puzzle.push_piece(goal).unwrap();

    let required_piece_id =
        puzzle.push_piece(Piece::new(pid(0), vec![Voxel2D(0, 0)])).unwrap();
    let optional_piece_id =
        puzzle.push_piece(Piece::new(pid(0), vec![Voxel2D(0, 0)])).unwrap();

    let problem = Problem::new("optional voxel", goal_id)
        .with_piece_count(required_piece_id, 1)
        .with_piece_count(optional_piece_id, puzzle_core::CountRange { min: 0, max: 1 });
    let config = SolveConfig::default();
    let mut callbacks = TaskCallbacks::new();
    let solutions = solve(&puzzle, &problem, &config, &mut callbacks).unwrap();

    assert!(!solutions.is_empty());
    let required = Voxel2D(0, 0);
    let optional = Voxel2D(1, 0);
    for solution in &solutions {
        let covered: std::collections::HashSet<Voxel2D> =
            solution.placements.iter().flat_map(|p| p.voxels.iter().copied()).collect();
        assert!(covered.contains(&required), "the non-optional goal voxel must always be covered");
        assert!(covered.len() == 1 || covered.len() == 2);
        let _ = optional;
    }
    assert!(
        solutions.iter().any(|s| s.placements.iter().map(|p| p.voxels.len()).sum::<usize>() == 1),
        "expected at least one solution covering only the required voxel"
    );
    assert!(
        solutions.iter().any(|s| s.placements.iter().map(|p| p.voxels.len()).sum::<usize>() == 2),
        "expected at least one solution also covering the optional voxel"
    );
}
