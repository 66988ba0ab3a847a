//! Pieces: named, labeled sets of voxels with optional per-voxel attributes.

use std::collections::HashMap;
use std::fmt;

use crate::grid::Grid;

puzzle_util::typed_index_struct! {
    /// Identifier of a piece, unique within a [`crate::Problem`].
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PieceId(u16);
}

/// The only voxel attribute the core interprets. Present only on the goal
/// piece; see [`Piece::is_optional`].
pub const OPTIONAL_ATTRIBUTE: &str = "optional";

/// A rigid piece: an identified, labeled set of voxels, with optional
/// per-voxel boolean attributes.
///
/// Equality compares voxel sets and attribute values restricted to voxels
/// present in both pieces, ignoring id, instance, label, color, and bounds —
/// this is what lets the placement enumerator and symmetry reducer compare
/// orientations of the same piece without caring about bookkeeping fields.
pub struct Piece<G: Grid> {
    /// Id of the piece within its problem. Shared by every placement and
    /// instance of the same logical piece.
    pub id: PieceId,
    /// Disambiguates duplicate instances of the same piece id within an
    /// assembly. `None` until the facade assigns one (see
    /// [`Piece::complete_id`]).
    pub instance: Option<u16>,
    /// The piece's cells. Insertion order is irrelevant for equality;
    /// duplicate voxels collapse to one.
    pub voxels: Vec<G::Voxel>,
    /// `attribute -> voxel -> value`. The only attribute the core
    /// interprets is [`OPTIONAL_ATTRIBUTE`], and only on the goal piece.
    pub voxel_attributes: HashMap<String, HashMap<G::Voxel, bool>>,
    /// Display-only label.
    pub label: Option<String>,
    /// Display-only color.
    pub color: Option<String>,
    /// Display-only cached bounds.
    pub bounds: Option<G::Bounds>,
}

impl<G: Grid> Piece<G> {
    /// Constructs a piece with no attributes, label, color, or bounds.
    pub fn new(id: PieceId, voxels: Vec<G::Voxel>) -> Self {
        Self {
            id,
            instance: None,
            voxels,
            voxel_attributes: HashMap::new(),
            label: None,
            color: None,
            bounds: None,
        }
    }

    /// Returns `"{id}"`, or `"{id}-{instance}"` when an instance is set.
    pub fn complete_id(&self) -> String {
        match self.instance {
            Some(instance) => format!("{}-{instance}", self.id.0),
            None => format!("{}", self.id.0),
        }
    }

    /// Returns whether `voxel` is marked `optional` on this piece. Always
    /// `false` for voxels not present in the piece or not present in the
    /// `optional` attribute map.
    pub fn is_optional(&self, voxel: G::Voxel) -> bool {
        self.voxel_attributes
            .get(OPTIONAL_ATTRIBUTE)
            .and_then(|m| m.get(&voxel))
            .copied()
            .unwrap_or(false)
    }

    /// Returns a copy of this piece with its voxels replaced by
    /// `new_voxels`, which must be the same length and in the same index
    /// order as `self.voxels` (so per-voxel attributes carry over
    /// positionally). Used by the placement enumerator, which never changes
    /// a piece's voxel *count*, only their positions.
    pub fn with_voxels(&self, new_voxels: Vec<G::Voxel>) -> Self {
        use itertools::Itertools as _;

        let remap: HashMap<G::Voxel, G::Voxel> = self
            .voxels
            .iter()
            .copied()
            .zip_eq(new_voxels.iter().copied())
            .collect();
        let voxel_attributes = self
            .voxel_attributes
            .iter()
            .map(|(attr, by_voxel)| {
                let remapped = by_voxel
                    .iter()
                    .filter_map(|(v, value)| remap.get(v).map(|nv| (*nv, *value)))
                    .collect();
                (attr.clone(), remapped)
            })
            .collect();
        Self {
            id: self.id,
            instance: self.instance,
            voxels: new_voxels,
            voxel_attributes,
            label: self.label.clone(),
            color: self.color.clone(),
            bounds: None,
        }
    }
}

impl<G: Grid> Clone for Piece<G> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            instance: self.instance,
            voxels: self.voxels.clone(),
            voxel_attributes: self.voxel_attributes.clone(),
            label: self.label.clone(),
            color: self.color.clone(),
            bounds: self.bounds.clone(),
        }
    }
}

impl<G: Grid> fmt::Debug for Piece<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Piece")
            .field("id", &self.id)
            .field("instance", &self.instance)
            .field("voxels", &self.voxels)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<G: Grid> PartialEq for Piece<G> {
    fn eq(&self, other: &Self) -> bool {
        use std::collections::HashSet;

        let self_voxels: HashSet<G::Voxel> = self.voxels.iter().copied().collect();
        let other_voxels: HashSet<G::Voxel> = other.voxels.iter().copied().collect();
        if self_voxels != other_voxels {
            return false;
        }

        let attr_names: HashSet<&String> = self
            .voxel_attributes
            .keys()
            .chain(other.voxel_attributes.keys())
            .collect();
        attr_names.into_iter().all(|attr| {
            let empty = HashMap::new();
            let a = self.voxel_attributes.get(attr).unwrap_or(&empty);
            let b = other.voxel_attributes.get(attr).unwrap_or(&empty);
            self_voxels.iter().all(|v| a.get(v).copied() == b.get(v).copied())
        })
    }
}

impl<G: Grid> Eq for Piece<G> {}

/// Plain-data mirror of [`Piece`]'s canonical wire shape (§6): `voxels` is
/// the `"v1; v2; ..."` string, `voxelAttributes`' inner voxel keys are each
/// voxel's string form. Every field here is a concrete, non-generic type, so
/// this can `#[derive]` serde without running into the `G: Grid` associated
/// types that keep `Piece` itself from deriving it directly.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PieceRepr {
    id: PieceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instance: Option<u16>,
    voxels: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    voxel_attributes: HashMap<String, HashMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

#[cfg(feature = "serde")]
impl<G: Grid> serde::Serialize for Piece<G>
where
    G::Voxel: fmt::Display,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::Serialize as _;

        let voxels = self.voxels.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
        let voxel_attributes = self
            .voxel_attributes
            .iter()
            .map(|(attr, by_voxel)| {
                let by_voxel = by_voxel.iter().map(|(v, value)| (v.to_string(), *value)).collect();
                (attr.clone(), by_voxel)
            })
            .collect();
        PieceRepr {
            id: self.id,
            instance: self.instance,
            voxels,
            voxel_attributes,
            label: self.label.clone(),
            color: self.color.clone(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, G: Grid> serde::Deserialize<'de> for Piece<G>
where
    G::Voxel: std::str::FromStr,
    <G::Voxel as std::str::FromStr>::Err: fmt::Display,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::Deserialize as _;

        let repr = PieceRepr::deserialize(deserializer)?;

        let parse_voxel = |s: &str| -> Result<G::Voxel, D::Error> {
            s.parse::<G::Voxel>().map_err(|e| serde::de::Error::custom(format!("invalid voxel {s:?}: {e}")))
        };

        let voxels = repr
            .voxels
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_voxel)
            .collect::<Result<Vec<_>, _>>()?;

        let mut voxel_attributes = HashMap::with_capacity(repr.voxel_attributes.len());
        for (attr, by_voxel) in repr.voxel_attributes {
            let mut parsed = HashMap::with_capacity(by_voxel.len());
            for (v, value) in by_voxel {
                parsed.insert(parse_voxel(&v)?, value);
            }
            voxel_attributes.insert(attr, parsed);
        }

        Ok(Self {
            id: repr.id,
            instance: repr.instance,
            voxels,
            voxel_attributes,
            label: repr.label,
            color: repr.color,
            // Display-only; recomputed on demand via `Grid::voxel_bounds`,
            // not part of the canonical wire shape or of `Piece` equality.
            bounds: None,
        })
    }
}
