//! [`Puzzle`]: a grid plus its catalog of pieces. [`Problem`]: a solve
//! request against a puzzle's pieces.

use std::collections::HashMap;

use puzzle_util::ti::TiVec;

use crate::grid::Grid;
use crate::piece::{Piece, PieceId};

/// How many copies of a piece a [`Problem`] allows. `min == max` for a fixed
/// count; `min < max` for a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CountRangeRepr {
    /// A fixed count, serialised as a bare integer.
    Fixed(u32),
    /// An explicit `{min, max}` range.
    Range {
        /// Minimum number of copies (inclusive).
        min: u32,
        /// Maximum number of copies (inclusive).
        max: u32,
    },
}

/// How many copies of a piece a [`Problem`] uses: between `min` and `max`
/// inclusive. A bare integer count (the common case) converts via
/// [`From<u32>`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRange {
    /// Minimum number of copies (inclusive).
    pub min: u32,
    /// Maximum number of copies (inclusive).
    pub max: u32,
}

impl From<u32> for CountRange {
    fn from(n: u32) -> Self {
        Self { min: n, max: n }
    }
}

impl From<CountRangeRepr> for CountRange {
    fn from(repr: CountRangeRepr) -> Self {
        match repr {
            CountRangeRepr::Fixed(n) => Self { min: n, max: n },
            CountRangeRepr::Range { min, max } => Self { min, max },
        }
    }
}

impl From<CountRange> for CountRangeRepr {
    fn from(range: CountRange) -> Self {
        if range.min == range.max {
            Self::Fixed(range.min)
        } else {
            Self::Range { min: range.min, max: range.max }
        }
    }
}

impl CountRange {
    /// Returns whether this piece is used at all (i.e. `max > 0`).
    pub fn is_used(self) -> bool {
        self.max > 0
    }

    /// Returns whether `count` lies within `[min, max]`.
    pub fn contains(self, count: u32) -> bool {
        self.min <= count && count <= self.max
    }
}

/// Symmetry-reduction mode requested for a solve. Restricting one piece's
/// allowed orientations (§4.3) is how either level is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SymmetryReduction {
    /// No symmetry reduction: every cover solution is reported.
    #[default]
    None,
    /// Quotient by the grid's proper rotation group.
    Rotation,
    /// Quotient by the grid's rotation-and-mirror group.
    #[cfg_attr(feature = "serde", serde(rename = "rotation+mirror"))]
    RotationAndMirror,
}

impl SymmetryReduction {
    /// Returns whether mirror images should be included among the
    /// orientations considered for reduction.
    pub fn include_mirrors(self) -> bool {
        matches!(self, Self::RotationAndMirror)
    }

    /// Returns whether any reduction is requested at all.
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A grid plus the catalog of pieces defined on it (the goal piece and every
/// piece available to place). Pieces are stored by [`PieceId`] in insertion
/// order, which is also the deterministic iteration order the solver uses.
pub struct Puzzle<G: Grid> {
    /// The geometry this puzzle's pieces live on.
    pub grid: G,
    /// Every piece defined for this puzzle, including the goal.
    pub pieces: TiVec<PieceId, Piece<G>>,
}

impl<G: Grid> Puzzle<G> {
    /// Constructs an empty puzzle on `grid`.
    pub fn new(grid: G) -> Self {
        Self { grid, pieces: TiVec::new() }
    }

    /// Appends `piece` to the catalog and returns its assigned id.
    ///
    /// Ignores whatever id `piece.id` currently holds; the returned id is
    /// authoritative. Fails only if the catalog has grown past
    /// [`PieceId`]'s range, which cannot happen for any realistic puzzle.
    pub fn push_piece(
        &mut self,
        mut piece: Piece<G>,
    ) -> Result<PieceId, puzzle_util::error::IndexOverflow> {
        let id = self.pieces.next_idx()?;
        piece.id = id;
        self.pieces.push(piece)?;
        Ok(id)
    }

    /// Looks up a piece by id.
    pub fn piece(&self, id: PieceId) -> Option<&Piece<G>> {
        self.pieces.get(id).ok()
    }
}

/// A solve request: which piece in a [`Puzzle`] is the goal, how many copies
/// of each other piece to use, and what post-processing to apply.
///
/// Invariants upheld by [`Problem::validate`] (called by the facade before
/// solving): the goal id never appears in `used_piece_counts`; entries with
/// `max == 0` are pruned rather than stored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Problem {
    /// Display label, not interpreted by the solver.
    pub label: String,
    /// Id of the goal piece within the associated [`Puzzle`].
    pub goal_piece_id: PieceId,
    /// How many copies of each non-goal piece to use.
    #[cfg_attr(feature = "serde", serde(with = "used_piece_counts_serde"))]
    pub used_piece_counts: HashMap<PieceId, CountRange>,
    /// Symmetry-reduction mode for this solve.
    pub symmetry_reduction: SymmetryReduction,
    /// Whether to run the disassembler on each cover solution.
    pub disassemble: bool,
    /// Whether to drop solutions for which no disassembly was found. Only
    /// meaningful when `disassemble` is set.
    pub remove_no_disassembly: bool,
}

impl Problem {
    /// Constructs a problem with no piece counts set, disassembly disabled.
    pub fn new(label: impl Into<String>, goal_piece_id: PieceId) -> Self {
        Self {
            label: label.into(),
            goal_piece_id,
            used_piece_counts: HashMap::new(),
            symmetry_reduction: SymmetryReduction::default(),
            disassemble: false,
            remove_no_disassembly: false,
        }
    }

    /// Sets the count (or range) of `piece_id` to use, overwriting any
    /// previous entry. A zero-max range removes the entry instead of storing
    /// a useless zero count, matching the "zero-count entries do not exist"
    /// invariant.
    pub fn with_piece_count(mut self, piece_id: PieceId, count: impl Into<CountRange>) -> Self {
        let range = count.into();
        if range.max == 0 {
            self.used_piece_counts.remove(&piece_id);
        } else {
            self.used_piece_counts.insert(piece_id, range);
        }
        self
    }
}

#[cfg(feature = "serde")]
mod used_piece_counts_serde {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{CountRange, CountRangeRepr};
    use crate::piece::PieceId;

    pub fn serialize<S: Serializer>(
        map: &HashMap<PieceId, CountRange>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let as_repr: HashMap<PieceId, CountRangeRepr> =
            map.iter().map(|(&id, &range)| (id, range.into())).collect();
        as_repr.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<PieceId, CountRange>, D::Error> {
        let as_repr = HashMap::<PieceId, CountRangeRepr>::deserialize(deserializer)?;
        Ok(as_repr.into_iter().map(|(id, repr)| (id, repr.into())).collect())
    }
}
