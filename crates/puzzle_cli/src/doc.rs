//! JSON document format read by the `solve` subcommand.
//!
//! Voxels are plain strings in each grid's own syntax (see each grid
//! crate's module docs); the core data model (`Piece`, `Puzzle`) is generic
//! over the grid and doesn't derive `serde` itself, so this module is the
//! boundary that turns grid-specific strings into `G::Voxel`s.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use puzzle_core::problem::CountRangeRepr;
use puzzle_core::{CountRange, Piece, PieceId, Problem, Puzzle, SymmetryReduction};
use serde::Deserialize;

/// Which grid a [`PuzzleFile`] is defined on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    Cubic,
    Square,
    Rhombic,
}

#[derive(Debug, Deserialize)]
pub struct PieceDoc {
    pub voxels: Vec<String>,
    #[serde(default)]
    pub optional_voxels: Vec<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDoc {
    pub label: String,
    #[serde(default)]
    pub used_piece_counts: HashMap<usize, CountRangeRepr>,
    #[serde(default)]
    pub symmetry_reduction: SymmetryReduction,
    #[serde(default)]
    pub disassemble: bool,
    #[serde(default)]
    pub remove_no_disassembly: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveConfigDoc {
    #[serde(default)]
    pub max_solutions: Option<usize>,
    #[serde(default = "default_node_budget")]
    pub node_budget: usize,
    #[serde(default = "default_true")]
    pub dedupe_symmetric_assemblies: bool,
}

fn default_node_budget() -> usize {
    100_000
}

fn default_true() -> bool {
    true
}

impl Default for SolveConfigDoc {
    fn default() -> Self {
        Self {
            max_solutions: None,
            node_budget: default_node_budget(),
            dedupe_symmetric_assemblies: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleFile {
    pub grid: GridKind,
    pub goal: PieceDoc,
    #[serde(default)]
    pub pieces: Vec<PieceDoc>,
    pub problem: ProblemDoc,
    #[serde(default)]
    pub solve: SolveConfigDoc,
}

/// Builds a [`Puzzle`] and [`Problem`] from a parsed document, parsing every
/// voxel string with `parse_voxel`.
///
/// `pieces[i]`'s assigned [`PieceId`] is what `problem.used_piece_counts`'
/// keys (0-based positions into `doc.pieces`) are resolved against; the goal
/// piece always gets the first id.
pub fn build<G, E>(
    doc: &PuzzleFile,
    grid: G,
    parse_voxel: impl Fn(&str) -> Result<G::Voxel, E>,
) -> Result<(Puzzle<G>, Problem), String>
where
    G: puzzle_core::Grid,
    E: fmt::Display,
{
    let parse_list = |voxels: &[String]| -> Result<Vec<G::Voxel>, String> {
        voxels.iter().map(|s| parse_voxel(s).map_err(|e| format!("invalid voxel {s:?}: {e}"))).collect()
    };

    let mut puzzle = Puzzle::new(grid);

    // `push_piece` overwrites whatever id is passed to `Piece::new`, so the
    // placeholder id here is never observed.
    let mut goal_piece = Piece::new(PieceId::default(), parse_list(&doc.goal.voxels)?);
    if !doc.goal.optional_voxels.is_empty() {
        let optional_voxels = parse_list(&doc.goal.optional_voxels)?;
        let attr = goal_piece.voxel_attributes.entry(puzzle_core::piece::OPTIONAL_ATTRIBUTE.to_string()).or_default();
        for v in optional_voxels {
            attr.insert(v, true);
        }
    }
    goal_piece.label = doc.goal.label.clone();
    goal_piece.color = doc.goal.color.clone();
    let goal_id = puzzle.push_piece(goal_piece).map_err(|e| e.to_string())?;

    let mut piece_ids = Vec::with_capacity(doc.pieces.len());
    for piece_doc in &doc.pieces {
        let mut piece = Piece::new(PieceId::default(), parse_list(&piece_doc.voxels)?);
        piece.label = piece_doc.label.clone();
        piece.color = piece_doc.color.clone();
        let id = puzzle.push_piece(piece).map_err(|e| e.to_string())?;
        piece_ids.push(id);
    }

    let mut problem = Problem::new(doc.problem.label.clone(), goal_id);
    problem.symmetry_reduction = doc.problem.symmetry_reduction;
    problem.disassemble = doc.problem.disassemble;
    problem.remove_no_disassembly = doc.problem.remove_no_disassembly;
    for (&index, &count) in &doc.problem.used_piece_counts {
        let piece_id = *piece_ids
            .get(index)
            .ok_or_else(|| format!("usedPieceCounts references piece index {index}, but only {} pieces are defined", piece_ids.len()))?;
        let range: CountRange = count.into();
        problem = problem.with_piece_count(piece_id, range);
    }

    Ok((puzzle, problem))
}

/// A parser used by [`build`] for grids whose `Voxel` implements `FromStr`.
pub fn from_str_parser<V: FromStr>(s: &str) -> Result<V, V::Err> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use puzzle_grid_square::SquareGrid;

    use super::*;

    fn sample_doc() -> PuzzleFile {
        serde_json::from_str(
            r#"{
                "grid": "square",
                "goal": {"voxels": ["0,0", "1,0", "0,1", "1,1"]},
                "pieces": [
                    {"voxels": ["0,0", "1,0"], "label": "domino"}
                ],
                "problem": {
                    "label": "2x2 with dominoes",
                    "usedPieceCounts": {"0": 2}
                }
            }"#,
        )
        .expect("valid document")
    }

    #[test]
    fn document_parses_and_assigns_piece_ids() {
        let doc = sample_doc();
        assert_eq!(doc.grid, GridKind::Square);
        assert_eq!(doc.goal.voxels.len(), 4);
        assert_eq!(doc.pieces.len(), 1);
    }

    #[test]
    fn build_resolves_used_piece_counts_by_index() {
        let doc = sample_doc();
        let (puzzle, problem) = build(&doc, SquareGrid, from_str_parser::<puzzle_grid_square::SquareVoxel>).unwrap();
        assert_eq!(puzzle.pieces.len(), 2);
        assert_eq!(problem.used_piece_counts.len(), 1);
        let domino_id = puzzle.pieces.iter_keys().nth(1).unwrap();
        assert_eq!(problem.used_piece_counts[&domino_id].min, 2);
        assert_eq!(problem.used_piece_counts[&domino_id].max, 2);
    }

    #[test]
    fn unknown_piece_index_is_rejected() {
        let mut doc = sample_doc();
        doc.problem.used_piece_counts.insert(5, CountRangeRepr::Fixed(1));
        assert!(build(&doc, SquareGrid, from_str_parser::<puzzle_grid_square::SquareVoxel>).is_err());
    }
}
