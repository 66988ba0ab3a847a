//! [`Solution`]: one way to tile a goal, plus any disassemblies found for it.

use std::fmt;

use crate::assembly::Assembly;
use crate::disassembly::Disassembly;
use crate::grid::Grid;

/// One cover-solution, reconstructed as an assembly of placed pieces, plus
/// whatever disassemblies were found for it (only computed when the
/// originating [`crate::Problem::disassemble`] flag was set).
pub struct Solution<G: Grid> {
    /// 1-based id, assigned after post-filtering (§4.5 step 6); stable for
    /// the lifetime of a single solve, not across solves.
    pub id: u32,
    /// The pieces as placed, pairwise voxel-disjoint.
    pub placements: Assembly<G>,
    /// Disassemblies found for this solution, or `None` if disassembly
    /// wasn't requested. An empty (but `Some`) list means disassembly was
    /// requested and none were found.
    pub disassemblies: Option<Vec<Disassembly<G>>>,
}

impl<G: Grid> Solution<G> {
    /// Constructs a solution with no disassemblies computed yet.
    pub fn new(id: u32, placements: Assembly<G>) -> Self {
        Self { id, placements, disassemblies: None }
    }

    /// Returns whether this solution should survive a
    /// `remove_no_disassembly` filter: true unless disassembly was
    /// requested and none were found.
    pub fn survives_no_disassembly_filter(&self) -> bool {
        match &self.disassemblies {
            None => true,
            Some(ds) => !ds.is_empty(),
        }
    }
}

impl<G: Grid> Clone for Solution<G> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            placements: self.placements.clone(),
            disassemblies: self.disassemblies.clone(),
        }
    }
}

impl<G: Grid> fmt::Debug for Solution<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solution")
            .field("id", &self.id)
            .field("n_pieces", &self.placements.len())
            .field("n_disassemblies", &self.disassemblies.as_ref().map(Vec::len))
            .finish()
    }
}

#[cfg(feature = "serde")]
impl<G: Grid> serde::Serialize for Solution<G>
where
    G::Voxel: fmt::Display,
    G::Transform: fmt::Display,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct as _;

        let placements: &[crate::piece::Piece<G>] = &self.placements;
        let mut state = serializer.serialize_struct("Solution", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("placements", placements)?;
        state.serialize_field("disassemblies", &self.disassemblies)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, G: Grid> serde::Deserialize<'de> for Solution<G>
where
    G::Voxel: std::str::FromStr,
    <G::Voxel as std::str::FromStr>::Err: fmt::Display,
    G::Transform: std::str::FromStr,
    <G::Transform as std::str::FromStr>::Err: fmt::Display,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use std::marker::PhantomData;

        use serde::de::{self, MapAccess, Visitor};

        #[derive(serde::Deserialize)]
        #[serde(field_identifier, rename_all = "camelCase")]
        enum Field {
            Id,
            Placements,
            Disassemblies,
        }

        struct SolutionVisitor<G: Grid>(PhantomData<G>);

        impl<'de, G: Grid> Visitor<'de> for SolutionVisitor<G>
        where
            G::Voxel: std::str::FromStr,
            <G::Voxel as std::str::FromStr>::Err: fmt::Display,
            G::Transform: std::str::FromStr,
            <G::Transform as std::str::FromStr>::Err: fmt::Display,
        {
            type Value = Solution<G>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a Solution object with id, placements, and an optional disassemblies list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut id = None;
                let mut placements = None;
                let mut disassemblies = None;
                while let Some(key) = map.next_key::<Field>()? {
                    match key {
                        Field::Id => id = Some(map.next_value()?),
                        Field::Placements => {
                            placements = Some(map.next_value::<Vec<crate::piece::Piece<G>>>()?);
                        }
                        Field::Disassemblies => disassemblies = map.next_value()?,
                    }
                }
                let id = id.ok_or_else(|| de::Error::missing_field("id"))?;
                let placements = placements.ok_or_else(|| de::Error::missing_field("placements"))?;
                Ok(Solution { id, placements: Assembly::from_pieces(placements), disassemblies })
            }
        }

        deserializer.deserialize_struct(
            "Solution",
            &["id", "placements", "disassemblies"],
            SolutionVisitor(PhantomData),
        )
    }
}
