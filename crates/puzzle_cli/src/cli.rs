//! `clap` argument definitions and subcommand dispatch.

use std::fs;
use std::path::PathBuf;

use puzzle_grid_cubic::{CubicGrid, CubicVoxel};
use puzzle_grid_rhombic::{RhombicGrid, RhombicVoxel};
use puzzle_grid_square::{SquareGrid, SquareVoxel};

use crate::doc::{self, GridKind, PuzzleFile};
use crate::output;

#[derive(Debug, clap::Parser)]
pub struct Args {
    #[command(subcommand)]
    pub subcommand: Option<Subcommand>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    /// Solve a puzzle document and print its solutions as JSON.
    Solve {
        /// Path to the puzzle document. Reads stdin if omitted.
        path: Option<PathBuf>,
        /// Stop after this many solutions. Overrides the document's
        /// `solve.maxSolutions`, if any.
        #[arg(long)]
        max_solutions: Option<usize>,
        /// Node budget for the disassembler's non-separating search.
        /// Overrides the document's `solve.nodeBudget`.
        #[arg(long)]
        node_budget: Option<usize>,
        /// Skip the symmetric-assembly dedup pass, even if the document's
        /// `solve.dedupeSymmetricAssemblies` asks for it.
        #[arg(long)]
        no_dedupe_symmetric_assemblies: bool,
    },
    /// Parse a puzzle document and print back its piece/goal voxel counts.
    /// Useful for sanity-checking a document before a long solve.
    Inspect {
        /// Path to the puzzle document. Reads stdin if omitted.
        path: Option<PathBuf>,
    },
}

pub(crate) fn exec(subcommand: Subcommand) -> eyre::Result<()> {
    match subcommand {
        Subcommand::Solve { path, max_solutions, node_budget, no_dedupe_symmetric_assemblies } => {
            solve(path, max_solutions, node_budget, no_dedupe_symmetric_assemblies)
        }
        Subcommand::Inspect { path } => inspect(path),
    }
}

fn read_doc(path: Option<PathBuf>) -> eyre::Result<PuzzleFile> {
    let raw = match path {
        Some(path) => fs::read_to_string(&path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    Ok(serde_json::from_str(&raw)?)
}

fn solve(
    path: Option<PathBuf>,
    max_solutions: Option<usize>,
    node_budget: Option<usize>,
    no_dedupe_symmetric_assemblies: bool,
) -> eyre::Result<()> {
    let doc = read_doc(path)?;
    let config = puzzle_solver::SolveConfig {
        max_solutions: max_solutions.or(doc.solve.max_solutions),
        node_budget: node_budget.unwrap_or(doc.solve.node_budget),
        dedupe_symmetric_assemblies: doc.solve.dedupe_symmetric_assemblies && !no_dedupe_symmetric_assemblies,
    };
    let mut callbacks = puzzle_core::TaskCallbacks::new();

    let json = match doc.grid {
        GridKind::Cubic => {
            let (puzzle, problem) = doc::build(&doc, CubicGrid, doc::from_str_parser::<CubicVoxel>)
                .map_err(|e| eyre::eyre!(e))?;
            let solutions = puzzle_solver::solve(&puzzle, &problem, &config, &mut callbacks)?;
            output::solutions_to_json(&solutions)
        }
        GridKind::Square => {
            let (puzzle, problem) = doc::build(&doc, SquareGrid, doc::from_str_parser::<SquareVoxel>)
                .map_err(|e| eyre::eyre!(e))?;
            let solutions = puzzle_solver::solve(&puzzle, &problem, &config, &mut callbacks)?;
            output::solutions_to_json(&solutions)
        }
        GridKind::Rhombic => {
            let (puzzle, problem) = doc::build(&doc, RhombicGrid, doc::from_str_parser::<RhombicVoxel>)
                .map_err(|e| eyre::eyre!(e))?;
            let solutions = puzzle_solver::solve(&puzzle, &problem, &config, &mut callbacks)?;
            output::solutions_to_json(&solutions)
        }
    };

    write_json_output(&json)
}

fn inspect(path: Option<PathBuf>) -> eyre::Result<()> {
    let doc = read_doc(path)?;
    let summary = serde_json::json!({
        "grid": match doc.grid {
            GridKind::Cubic => "cubic",
            GridKind::Square => "square",
            GridKind::Rhombic => "rhombic",
        },
        "goalVoxels": doc.goal.voxels.len(),
        "pieceCount": doc.pieces.len(),
        "usedPieceCounts": doc.problem.used_piece_counts.len(),
    });
    write_json_output(&summary)
}

fn write_json_output<T: serde::Serialize>(value: &T) -> eyre::Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), value)?;
    println!();
    Ok(())
}
