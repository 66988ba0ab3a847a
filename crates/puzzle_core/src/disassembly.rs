//! [`Disassembly`]: a sequence of [`DisassemblyStep`]s that separates an
//! assembly into individual pieces.

use std::collections::HashSet;
use std::fmt;

use crate::grid::Grid;

/// A single step of a disassembly: apply `transform` to every piece named in
/// `moved_pieces`, `repeat` times.
///
/// Serialises (see §6) as `"pieces=c1,c2 transform=T repeat=N separates"`,
/// where `repeat=1` and a non-`separates` step omit those tokens.
pub struct DisassemblyStep<G: Grid> {
    /// Complete ids (see [`crate::Piece::complete_id`]) of the pieces moved
    /// together in this step.
    pub moved_pieces: Vec<String>,
    /// The transform applied to every moved piece.
    pub transform: G::Transform,
    /// How many times `transform` is applied, at least 1.
    pub repeat: u32,
    /// Whether this step separates the moving group from the rest of the
    /// assembly (i.e. the grid reports them as [`Grid::is_separate`] after
    /// the step).
    pub separates: bool,
}

impl<G: Grid> DisassemblyStep<G> {
    /// Constructs a step with `repeat = 1`.
    pub fn new(moved_pieces: Vec<String>, transform: G::Transform, separates: bool) -> Self {
        Self { moved_pieces, transform, repeat: 1, separates }
    }
}

impl<G: Grid> Clone for DisassemblyStep<G> {
    fn clone(&self) -> Self {
        Self {
            moved_pieces: self.moved_pieces.clone(),
            transform: self.transform,
            repeat: self.repeat,
            separates: self.separates,
        }
    }
}

impl<G: Grid> fmt::Debug for DisassemblyStep<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisassemblyStep")
            .field("moved_pieces", &self.moved_pieces)
            .field("transform", &self.transform)
            .field("repeat", &self.repeat)
            .field("separates", &self.separates)
            .finish()
    }
}

impl<G: Grid> PartialEq for DisassemblyStep<G> {
    fn eq(&self, other: &Self) -> bool {
        self.moved_pieces == other.moved_pieces
            && self.transform == other.transform
            && self.repeat == other.repeat
            && self.separates == other.separates
    }
}

/// An ordered list of steps that, applied in order to a starting assembly,
/// separates it into individual pieces.
#[derive(Clone, Default)]
pub struct Disassembly<G: Grid> {
    /// The steps, in application order.
    pub steps: Vec<DisassemblyStep<G>>,
}

impl<G: Grid> Disassembly<G> {
    /// Constructs a disassembly from a list of steps.
    pub fn new(steps: Vec<DisassemblyStep<G>>) -> Self {
        Self { steps }
    }

    /// Number of distinct assembly states visited, including the start and
    /// end states: `steps.len() + 1`.
    pub fn n_states(&self) -> usize {
        self.steps.len() + 1
    }

    /// Rewrites `steps` so that, after each separating step, all steps of
    /// one resulting sub-branch precede all steps of the other — a
    /// depth-first linearisation of the disassembly tree. Idempotent and
    /// preserves the multiset of steps.
    ///
    /// The disassembler (`puzzle_solver::disassembler`) already builds steps
    /// in this order (it recurses into one sub-assembly fully before the
    /// other), so this is a no-op on solver-produced disassemblies; it
    /// exists so callers that reassemble a `Disassembly` from unordered step
    /// fragments (e.g. after editing) can restore the invariant.
    pub fn reorder(&self) -> Self {
        Self { steps: reorder_steps(self.steps.clone()) }
    }
}

/// Finds the first separating step, then recursively splits everything
/// after it into the moved group's own steps and the rest's, and reorders
/// each half the same way — mirroring how `try_split` in the disassembler
/// itself assembles a path prefix, a separating step, then the group's and
/// the rest's steps in full.
fn reorder_steps<G: Grid>(steps: Vec<DisassemblyStep<G>>) -> Vec<DisassemblyStep<G>> {
    let Some(split_at) = steps.iter().position(|s| s.separates) else {
        return steps;
    };
    let mut prefix = steps;
    let remainder = prefix.split_off(split_at);
    let (separating_step, remainder) = {
        let mut iter = remainder.into_iter();
        let first = iter.next().expect("split_at points at an existing separating step");
        (first, iter.collect::<Vec<_>>())
    };

    let group: HashSet<&str> = separating_step.moved_pieces.iter().map(String::as_str).collect();
    let (group_steps, rest_steps): (Vec<_>, Vec<_>) =
        remainder.into_iter().partition(|s| s.moved_pieces.iter().all(|p| group.contains(p.as_str())));

    prefix.push(separating_step);
    prefix.extend(reorder_steps(group_steps));
    prefix.extend(reorder_steps(rest_steps));
    prefix
}

impl<G: Grid> fmt::Debug for Disassembly<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disassembly").field("steps", &self.steps).finish()
    }
}

impl<G: Grid> PartialEq for Disassembly<G> {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

#[cfg(feature = "serde")]
impl<G: Grid> serde::Serialize for DisassemblyStep<G>
where
    G::Transform: fmt::Display,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = format!(
            "pieces={} transform={}",
            self.moved_pieces.join(","),
            self.transform
        );
        if self.repeat != 1 {
            out.push_str(&format!(" repeat={}", self.repeat));
        }
        if self.separates {
            out.push_str(" separates");
        }
        serializer.serialize_str(&out)
    }
}

#[cfg(feature = "serde")]
impl<'de, G: Grid> serde::Deserialize<'de> for DisassemblyStep<G>
where
    G::Transform: std::str::FromStr,
    <G::Transform as std::str::FromStr>::Err: fmt::Display,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::Deserialize as _;

        let raw = String::deserialize(deserializer)?;
        parse_step::<G>(&raw).map_err(serde::de::Error::custom)
    }
}

/// Plain delegation to `Vec<DisassemblyStep<G>>`'s own (de)serialisation —
/// a `Disassembly` is just its ordered steps on the wire, same as in memory.
#[cfg(feature = "serde")]
impl<G: Grid> serde::Serialize for Disassembly<G>
where
    G::Transform: fmt::Display,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::Serialize as _;

        self.steps.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, G: Grid> serde::Deserialize<'de> for Disassembly<G>
where
    G::Transform: std::str::FromStr,
    <G::Transform as std::str::FromStr>::Err: fmt::Display,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::Deserialize as _;

        Ok(Self { steps: Vec::deserialize(deserializer)? })
    }
}

#[cfg(feature = "serde")]
fn parse_step<G: Grid>(raw: &str) -> Result<DisassemblyStep<G>, String>
where
    G::Transform: std::str::FromStr,
    <G::Transform as std::str::FromStr>::Err: fmt::Display,
{
    let mut moved_pieces = None;
    let mut transform = None;
    let mut repeat = 1;
    let mut separates = false;

    for token in raw.split_whitespace() {
        if token == "separates" {
            separates = true;
        } else if let Some(rest) = token.strip_prefix("pieces=") {
            moved_pieces = Some(rest.split(',').map(str::to_owned).collect());
        } else if let Some(rest) = token.strip_prefix("transform=") {
            transform = Some(
                rest.parse::<G::Transform>()
                    .map_err(|e| format!("invalid transform {rest:?}: {e}"))?,
            );
        } else if let Some(rest) = token.strip_prefix("repeat=") {
            repeat = rest
                .parse::<u32>()
                .map_err(|e| format!("invalid repeat {rest:?}: {e}"))?;
        } else {
            return Err(format!("unrecognized disassembly step token {token:?}"));
        }
    }

    Ok(DisassemblyStep {
        moved_pieces: moved_pieces.ok_or("missing pieces= token")?,
        transform: transform.ok_or("missing transform= token")?,
        repeat,
        separates,
    })
}
