//! Rhombic 3-D grid: voxels on the face-centered cubic lattice, represented
//! as `(x, y, z)` triples with `x + y + z` even — the standard embedding of
//! the rhombic dodecahedral honeycomb as the Voronoi cells of the FCC
//! lattice. Callers must only ever construct [`RhombicVoxel`]s satisfying
//! that parity; the grid does not check it, the same way `puzzle_core`
//! trusts its own callers' invariants.
//!
//! The 12 nearest neighbours sit at every permutation of `(±1, ±1, 0)`,
//! which is also the disassembly-transform generator set. The rotation
//! group of the rhombic dodecahedron is the same 24-/48-element octahedral
//! group as [`puzzle_grid_cubic`] acting on this basis, so rotations are
//! implemented directly in terms of [`puzzle_grid_cubic::CubicTransform`].

use std::fmt;
use std::str::FromStr;

use puzzle_core::Grid;
use puzzle_grid_cubic::{CubicGrid, CubicTransform};

/// A cell of the rhombic grid. `x + y + z` must be even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RhombicVoxel(pub i32, pub i32, pub i32);

impl fmt::Display for RhombicVoxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

impl FromStr for RhombicVoxel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ',');
        let x = parts.next().ok_or(ParseError::Malformed)?;
        let y = parts.next().ok_or(ParseError::Malformed)?;
        let z = parts.next().ok_or(ParseError::Malformed)?;
        let x: i32 = x.trim().parse().map_err(|_| ParseError::Malformed)?;
        let y: i32 = y.trim().parse().map_err(|_| ParseError::Malformed)?;
        let z: i32 = z.trim().parse().map_err(|_| ParseError::Malformed)?;
        if (x + y + z) % 2 != 0 {
            return Err(ParseError::OddParity(x, y, z));
        }
        Ok(RhombicVoxel(x, y, z))
    }
}

/// Error parsing a [`RhombicVoxel`] or [`CubicTransform`] from its string
/// syntax, or constructing a voxel off the FCC lattice.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("malformed rhombic-grid token")]
    Malformed,
    #[error("voxel ({0},{1},{2}) has odd coordinate sum, not on the FCC lattice")]
    OddParity(i32, i32, i32),
}

/// The rhombic 3-D grid. Zero-sized: all the geometry is in the associated
/// types, this is just a handle to call [`Grid`] methods on.
#[derive(Debug, Clone, Copy, Default)]
pub struct RhombicGrid;

impl RhombicGrid {
    fn apply_rotation(&self, t: CubicTransform, v: RhombicVoxel) -> RhombicVoxel {
        match t {
            CubicTransform::Rotate { perm, signs } => {
                let coords = [v.0, v.1, v.2];
                RhombicVoxel(
                    signs[0] * coords[perm[0]],
                    signs[1] * coords[perm[1]],
                    signs[2] * coords[perm[2]],
                )
            }
            CubicTransform::Translate(dx, dy, dz) => RhombicVoxel(v.0 + dx, v.1 + dy, v.2 + dz),
        }
    }
}

impl Grid for RhombicGrid {
    type Voxel = RhombicVoxel;
    type Transform = CubicTransform;
    type Bounds = (i32, i32, i32, i32, i32, i32);

    fn voxels_in_bounds(&self, bounds: &Self::Bounds) -> Vec<Self::Voxel> {
        let (x0, y0, z0, x1, y1, z1) = *bounds;
        (x0..=x1)
            .flat_map(|x| {
                (y0..=y1).flat_map(move |y| {
                    (z0..=z1).filter_map(move |z| ((x + y + z) % 2 == 0).then_some(RhombicVoxel(x, y, z)))
                })
            })
            .collect()
    }

    fn voxel_bounds(&self, voxels: &[Self::Voxel]) -> Self::Bounds {
        let x0 = voxels.iter().map(|v| v.0).min().expect("non-empty");
        let x1 = voxels.iter().map(|v| v.0).max().expect("non-empty");
        let y0 = voxels.iter().map(|v| v.1).min().expect("non-empty");
        let y1 = voxels.iter().map(|v| v.1).max().expect("non-empty");
        let z0 = voxels.iter().map(|v| v.2).min().expect("non-empty");
        let z1 = voxels.iter().map(|v| v.2).max().expect("non-empty");
        (x0, y0, z0, x1, y1, z1)
    }

    fn bounds_union(&self, bounds: &[Self::Bounds]) -> Self::Bounds {
        let x0 = bounds.iter().map(|b| b.0).min().expect("non-empty");
        let y0 = bounds.iter().map(|b| b.1).min().expect("non-empty");
        let z0 = bounds.iter().map(|b| b.2).min().expect("non-empty");
        let x1 = bounds.iter().map(|b| b.3).max().expect("non-empty");
        let y1 = bounds.iter().map(|b| b.4).max().expect("non-empty");
        let z1 = bounds.iter().map(|b| b.5).max().expect("non-empty");
        (x0, y0, z0, x1, y1, z1)
    }

    fn bounds_origin(&self, bounds: &Self::Bounds) -> Self::Voxel {
        RhombicVoxel(bounds.0, bounds.1, bounds.2)
    }

    fn apply_transform(&self, t: Self::Transform, voxels: &[Self::Voxel]) -> Vec<Self::Voxel> {
        voxels.iter().map(|&v| self.apply_rotation(t, v)).collect()
    }

    fn scale_transform(&self, t: Self::Transform, n: i32) -> Self::Transform {
        CubicGrid.scale_transform(t, n)
    }

    fn rotations(&self, include_mirrors: bool) -> Vec<Self::Transform> {
        CubicGrid.rotations(include_mirrors)
    }

    fn translation(&self, from: Self::Voxel, to: Self::Voxel) -> Self::Transform {
        CubicTransform::Translate(to.0 - from.0, to.1 - from.1, to.2 - from.2)
    }

    fn disassembly_transforms(&self) -> Vec<Self::Transform> {
        let mut out = Vec::with_capacity(12);
        for (dx, dy, dz) in [(1, 1, 0), (1, -1, 0), (-1, 1, 0), (-1, -1, 0)] {
            out.push(CubicTransform::Translate(dx, dy, dz));
            out.push(CubicTransform::Translate(dz, dx, dy));
            out.push(CubicTransform::Translate(dy, dz, dx));
        }
        out
    }

    fn is_separate(&self, a: &[Self::Voxel], b: &[Self::Voxel]) -> bool {
        use std::collections::HashSet;
        let a_set: HashSet<RhombicVoxel> = a.iter().copied().collect();
        let neighbor_offsets = self.disassembly_transforms();
        for v in b {
            if a_set.contains(v) {
                return false;
            }
            for t in &neighbor_offsets {
                let CubicTransform::Translate(dx, dy, dz) = *t else {
                    unreachable!("disassembly_transforms only returns translations")
                };
                if a_set.contains(&RhombicVoxel(v.0 + dx, v.1 + dy, v.2 + dz)) {
                    return false;
                }
            }
        }
        true
    }
}
