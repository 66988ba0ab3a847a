//! Builds the JSON printed for a solve run.
//!
//! [`puzzle_core::Solution`] and [`puzzle_core::Piece`] do have canonical
//! `serde` impls (see §6's wire format), but this binary's report shape is a
//! deliberately different, more display-friendly one — complete ids instead
//! of bare id/instance pairs, voxels as a JSON array of strings rather than
//! the canonical `"v1; v2"` form — so this hand-builds a `serde_json::Value`
//! tree the way the teacher's CLI hand-builds its own report structs, using
//! each grid's voxel/transform `Display` impl for the leaves.

use std::fmt;

use puzzle_core::{Grid, Solution};
use serde_json::{json, Value};

pub fn solutions_to_json<G: Grid>(solutions: &[Solution<G>]) -> Value
where
    G::Voxel: fmt::Display,
    G::Transform: fmt::Display,
{
    Value::Array(solutions.iter().map(solution_to_json).collect())
}

fn solution_to_json<G: Grid>(solution: &Solution<G>) -> Value
where
    G::Voxel: fmt::Display,
    G::Transform: fmt::Display,
{
    let placements: Vec<Value> = solution
        .placements
        .iter()
        .map(|piece| {
            json!({
                "id": piece.complete_id(),
                "label": piece.label,
                "color": piece.color,
                "voxels": piece.voxels.iter().map(ToString::to_string).collect::<Vec<_>>(),
            })
        })
        .collect();

    let disassemblies = solution.disassemblies.as_ref().map(|ds| {
        Value::Array(
            ds.iter()
                .map(|d| {
                    json!({
                        "steps": d.steps.iter().map(disassembly_step_to_json).collect::<Vec<_>>(),
                    })
                })
                .collect(),
        )
    });

    json!({
        "id": solution.id,
        "placements": placements,
        "disassemblies": disassemblies,
    })
}

fn disassembly_step_to_json<G: Grid>(step: &puzzle_core::DisassemblyStep<G>) -> Value
where
    G::Transform: fmt::Display,
{
    json!({
        "pieces": step.moved_pieces,
        "transform": step.transform.to_string(),
        "repeat": step.repeat,
        "separates": step.separates,
    })
}
