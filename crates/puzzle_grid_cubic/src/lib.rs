//! Cubic 3-D grid: voxels on the integer lattice `Z^3`, the octahedral
//! symmetry group (24 proper rotations, 48 with mirrors), and 6-adjacency.
//!
//! Voxels print as `"x,y,z"`; transforms print as `"t:dx,dy,dz"` for a
//! translation or `"r:<axis>,<phase>"` for a rotation, where `axis` names
//! one of the cube's 13 geometric rotation axes (3 face axes `x`/`y`/`z`, 6
//! edge axes `e<i><j><sign>`, 4 vertex axes `v<signs>`) and `phase` is the
//! rotation's position in that axis's cyclic subgroup. Mirrored transforms
//! are the improper elements, printed `"r:m:<axis>,<phase>"` for the proper
//! rotation obtained by also negating through the origin.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use puzzle_core::Grid;

/// A cell of the cubic grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicVoxel(pub i32, pub i32, pub i32);

impl fmt::Display for CubicVoxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

impl FromStr for CubicVoxel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ',');
        let x = parts.next().ok_or(ParseError::Malformed)?;
        let y = parts.next().ok_or(ParseError::Malformed)?;
        let z = parts.next().ok_or(ParseError::Malformed)?;
        let x = x.trim().parse().map_err(|_| ParseError::Malformed)?;
        let y = y.trim().parse().map_err(|_| ParseError::Malformed)?;
        let z = z.trim().parse().map_err(|_| ParseError::Malformed)?;
        Ok(CubicVoxel(x, y, z))
    }
}

/// A signed permutation of the 3 axes (a rotation or mirrored rotation, if
/// `signs` has an odd number of `-1`s times an odd permutation), or a pure
/// translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CubicTransform {
    Rotate { perm: [usize; 3], signs: [i32; 3] },
    Translate(i32, i32, i32),
}

const IDENTITY: ([usize; 3], [i32; 3]) = ([0, 1, 2], [1, 1, 1]);

fn apply(perm: [usize; 3], signs: [i32; 3], v: [i32; 3]) -> [i32; 3] {
    [signs[0] * v[perm[0]], signs[1] * v[perm[1]], signs[2] * v[perm[2]]]
}

/// Composes two signed permutations as `outer` after `inner`.
fn compose(
    outer: ([usize; 3], [i32; 3]),
    inner: ([usize; 3], [i32; 3]),
) -> ([usize; 3], [i32; 3]) {
    let (op, os) = outer;
    let (ip, is) = inner;
    let mut perm = [0; 3];
    let mut signs = [1; 3];
    for i in 0..3 {
        perm[i] = ip[op[i]];
        signs[i] = os[i] * is[op[i]];
    }
    (perm, signs)
}

fn permutation_parity(perm: [usize; 3]) -> i32 {
    let mut inversions = 0;
    for i in 0..3 {
        for j in (i + 1)..3 {
            if perm[i] > perm[j] {
                inversions += 1;
            }
        }
    }
    if inversions % 2 == 0 { 1 } else { -1 }
}

fn determinant(perm: [usize; 3], signs: [i32; 3]) -> i32 {
    permutation_parity(perm) * signs[0] * signs[1] * signs[2]
}

/// Rotation about one of the 13 geometric axes of the cube, `phase` steps
/// around that axis's cyclic subgroup. Returns `None` for an axis/phase
/// combination that doesn't exist (phase out of range for that axis's
/// order, or an unrecognized axis name).
fn rotation_for_axis_phase(axis: &str, phase: u8) -> Option<([usize; 3], [i32; 3])> {
    // Face axes: order 4, rotating the two coordinates orthogonal to `axis`.
    let face = |axis_idx: usize, a: usize, b: usize, phase: u8| -> ([usize; 3], [i32; 3]) {
        let mut perm = [0, 1, 2];
        let mut signs = [1, 1, 1];
        match phase % 4 {
            0 => {}
            1 => {
                perm[a] = b;
                perm[b] = a;
                signs[a] = -1;
            }
            2 => {
                signs[a] = -1;
                signs[b] = -1;
            }
            3 => {
                perm[a] = b;
                perm[b] = a;
                signs[b] = -1;
            }
            _ => unreachable!(),
        }
        (perm, signs)
    };

    // Edge axes: order 2, swapping the pair and negating the third coord.
    let edge = |i: usize, j: usize, phase: u8| -> ([usize; 3], [i32; 3]) {
        if phase % 2 == 0 {
            return IDENTITY;
        }
        let third = (0..3).find(|&k| k != i && k != j).expect("3 indices, 2 used");
        let mut perm = [0, 1, 2];
        perm[i] = j;
        perm[j] = i;
        let mut signs = [1, 1, 1];
        signs[third] = -1;
        (perm, signs)
    };

    // Vertex axes: order 3, conjugating the all-positive 3-cycle by the
    // axis's sign pattern `t`.
    let vertex = |t: [i32; 3], phase: u8| -> ([usize; 3], [i32; 3]) {
        let (perm, _) = match phase % 3 {
            0 => return IDENTITY,
            1 => ([2, 0, 1], [1, 1, 1]),
            2 => ([1, 2, 0], [1, 1, 1]),
            _ => unreachable!(),
        };
        let mut signs = [1, 1, 1];
        for i in 0..3 {
            signs[i] = t[i] * t[perm[i]];
        }
        (perm, signs)
    };

    match axis {
        "x" => Some(face(0, 1, 2, phase)),
        "y" => Some(face(1, 2, 0, phase)),
        "z" => Some(face(2, 0, 1, phase)),
        "e01+" => Some(edge(0, 1, phase)),
        "e01-" => {
            let (perm, mut signs) = edge(0, 1, phase);
            if phase % 2 == 1 {
                signs[0] = -signs[0];
                signs[1] = -signs[1];
            }
            Some((perm, signs))
        }
        "e02+" => Some(edge(0, 2, phase)),
        "e02-" => {
            let (perm, mut signs) = edge(0, 2, phase);
            if phase % 2 == 1 {
                signs[0] = -signs[0];
                signs[2] = -signs[2];
            }
            Some((perm, signs))
        }
        "e12+" => Some(edge(1, 2, phase)),
        "e12-" => {
            let (perm, mut signs) = edge(1, 2, phase);
            if phase % 2 == 1 {
                signs[1] = -signs[1];
                signs[2] = -signs[2];
            }
            Some((perm, signs))
        }
        "v+++" => Some(vertex([1, 1, 1], phase)),
        "v++-" => Some(vertex([1, 1, -1], phase)),
        "v+-+" => Some(vertex([1, -1, 1], phase)),
        "v+--" => Some(vertex([1, -1, -1], phase)),
        _ => None,
    }
}

const AXIS_NAMES: [&str; 13] =
    ["x", "y", "z", "e01+", "e01-", "e02+", "e02-", "e12+", "e12-", "v+++", "v++-", "v+-+", "v+--"];

fn axis_order(axis: &str) -> u8 {
    match axis {
        "x" | "y" | "z" => 4,
        "v+++" | "v++-" | "v+-+" | "v+--" => 3,
        _ => 2,
    }
}

/// Looks up a proper (`perm`, `signs`) pair's canonical `(axis, phase)`
/// label by brute-force search over the 13 axes. `perm`/`signs` must be
/// proper (determinant `+1`); callers handle the mirror case separately.
fn axis_phase_for_rotation(perm: [usize; 3], signs: [i32; 3]) -> Option<(&'static str, u8)> {
    for axis in AXIS_NAMES {
        for phase in 0..axis_order(axis) {
            if rotation_for_axis_phase(axis, phase) == Some((perm, signs)) {
                return Some((axis, phase));
            }
        }
    }
    None
}

impl fmt::Display for CubicTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CubicTransform::Translate(dx, dy, dz) => write!(f, "t:{dx},{dy},{dz}"),
            CubicTransform::Rotate { perm, signs } => {
                if determinant(perm, signs) == 1 {
                    let (axis, phase) = axis_phase_for_rotation(perm, signs)
                        .expect("every proper cubic rotation matches one of the 13 axes");
                    write!(f, "r:{axis},{phase}")
                } else {
                    let inner_signs = [-signs[0], -signs[1], -signs[2]];
                    let (axis, phase) = axis_phase_for_rotation(perm, inner_signs)
                        .expect("negating an improper rotation's signs gives a proper one");
                    write!(f, "r:m:{axis},{phase}")
                }
            }
        }
    }
}

impl FromStr for CubicTransform {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("t:") {
            let mut parts = rest.splitn(3, ',');
            let dx = parts.next().ok_or(ParseError::Malformed)?;
            let dy = parts.next().ok_or(ParseError::Malformed)?;
            let dz = parts.next().ok_or(ParseError::Malformed)?;
            let dx = dx.trim().parse().map_err(|_| ParseError::Malformed)?;
            let dy = dy.trim().parse().map_err(|_| ParseError::Malformed)?;
            let dz = dz.trim().parse().map_err(|_| ParseError::Malformed)?;
            return Ok(CubicTransform::Translate(dx, dy, dz));
        }
        let Some(rest) = s.strip_prefix("r:") else {
            return Err(ParseError::Malformed);
        };
        let (mirror, rest) = match rest.strip_prefix("m:") {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let (axis, phase) = rest.rsplit_once(',').ok_or(ParseError::Malformed)?;
        let phase: u8 = phase.trim().parse().map_err(|_| ParseError::Malformed)?;
        let (perm, signs) =
            rotation_for_axis_phase(axis, phase).ok_or_else(|| ParseError::UnknownAxis(axis.to_string()))?;
        let signs = if mirror { [-signs[0], -signs[1], -signs[2]] } else { signs };
        Ok(CubicTransform::Rotate { perm, signs })
    }
}

/// Error parsing a [`CubicVoxel`] or [`CubicTransform`] from its string
/// syntax.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("malformed cubic-grid token")]
    Malformed,
    #[error("unrecognized cubic rotation axis {0:?}")]
    UnknownAxis(String),
}

/// The cubic 3-D grid. Zero-sized: all the geometry is in the associated
/// types, this is just a handle to call [`Grid`] methods on.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicGrid;

impl CubicGrid {
    fn invert(&self, t: CubicTransform) -> CubicTransform {
        match t {
            CubicTransform::Translate(dx, dy, dz) => CubicTransform::Translate(-dx, -dy, -dz),
            CubicTransform::Rotate { perm, signs } => {
                let mut inv_perm = [0; 3];
                let mut inv_signs = [1; 3];
                for i in 0..3 {
                    inv_perm[perm[i]] = i;
                    inv_signs[perm[i]] = signs[i];
                }
                CubicTransform::Rotate { perm: inv_perm, signs: inv_signs }
            }
        }
    }
}

impl Grid for CubicGrid {
    type Voxel = CubicVoxel;
    type Transform = CubicTransform;
    type Bounds = (i32, i32, i32, i32, i32, i32);

    fn voxels_in_bounds(&self, bounds: &Self::Bounds) -> Vec<Self::Voxel> {
        let (x0, y0, z0, x1, y1, z1) = *bounds;
        (x0..=x1)
            .flat_map(|x| (y0..=y1).flat_map(move |y| (z0..=z1).map(move |z| CubicVoxel(x, y, z))))
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
        CubicVoxel(bounds.0, bounds.1, bounds.2)
    }

    fn apply_transform(&self, t: Self::Transform, voxels: &[Self::Voxel]) -> Vec<Self::Voxel> {
        match t {
            CubicTransform::Rotate { perm, signs } => voxels
                .iter()
                .map(|v| {
                    let [x, y, z] = apply(perm, signs, [v.0, v.1, v.2]);
                    CubicVoxel(x, y, z)
                })
                .collect(),
            CubicTransform::Translate(dx, dy, dz) => {
                voxels.iter().map(|v| CubicVoxel(v.0 + dx, v.1 + dy, v.2 + dz)).collect()
            }
        }
    }

    fn scale_transform(&self, t: Self::Transform, n: i32) -> Self::Transform {
        match t {
            CubicTransform::Translate(dx, dy, dz) => CubicTransform::Translate(dx * n, dy * n, dz * n),
            CubicTransform::Rotate { .. } => {
                let base = if n < 0 { self.invert(t) } else { t };
                let (base_perm, base_signs) = match base {
                    CubicTransform::Rotate { perm, signs } => (perm, signs),
                    CubicTransform::Translate(..) => unreachable!(),
                };
                let mut result = IDENTITY;
                for _ in 0..n.unsigned_abs() {
                    result = compose(result, (base_perm, base_signs));
                }
                CubicTransform::Rotate { perm: result.0, signs: result.1 }
            }
        }
    }

    fn rotations(&self, include_mirrors: bool) -> Vec<Self::Transform> {
        let perms: Vec<[usize; 3]> = [0usize, 1, 2].into_iter().permutations(3).map(|p| [p[0], p[1], p[2]]).collect();
        let sign_options = [-1, 1];
        let mut out = Vec::new();
        for perm in perms {
            for s0 in sign_options {
                for s1 in sign_options {
                    for s2 in sign_options {
                        let signs = [s0, s1, s2];
                        let det = determinant(perm, signs);
                        if det == 1 || (include_mirrors && det == -1) {
                            out.push(CubicTransform::Rotate { perm, signs });
                        }
                    }
                }
            }
        }
        out
    }

    fn translation(&self, from: Self::Voxel, to: Self::Voxel) -> Self::Transform {
        CubicTransform::Translate(to.0 - from.0, to.1 - from.1, to.2 - from.2)
    }

    fn disassembly_transforms(&self) -> Vec<Self::Transform> {
        vec![
            CubicTransform::Translate(1, 0, 0),
            CubicTransform::Translate(-1, 0, 0),
            CubicTransform::Translate(0, 1, 0),
            CubicTransform::Translate(0, -1, 0),
            CubicTransform::Translate(0, 0, 1),
            CubicTransform::Translate(0, 0, -1),
        ]
    }

    fn is_separate(&self, a: &[Self::Voxel], b: &[Self::Voxel]) -> bool {
        use std::collections::HashSet;
        let a_set: HashSet<CubicVoxel> = a.iter().copied().collect();
        for v in b {
            if a_set.contains(v) {
                return false;
            }
            for (dx, dy, dz) in [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)] {
                if a_set.contains(&CubicVoxel(v.0 + dx, v.1 + dy, v.2 + dz)) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn voxel_round_trips_through_its_string_syntax() {
        let v = CubicVoxel(-3, 4, 7);
        assert_eq!(v.to_string(), "-3,4,7");
        assert_eq!(v.to_string().parse::<CubicVoxel>().unwrap(), v);
    }

    #[test]
    fn every_proper_rotation_round_trips_through_its_string_syntax() {
        let grid = CubicGrid;
        for t in grid.rotations(false) {
            let s = t.to_string();
            assert_eq!(s.parse::<CubicTransform>().unwrap(), t, "round trip of {s:?}");
        }
    }

    #[test]
    fn every_mirrored_rotation_round_trips_through_its_string_syntax() {
        let grid = CubicGrid;
        for t in grid.rotations(true) {
            let s = t.to_string();
            assert_eq!(s.parse::<CubicTransform>().unwrap(), t, "round trip of {s:?}");
        }
    }

    #[test]
    fn translation_round_trips_through_its_string_syntax() {
        let t = CubicTransform::Translate(1, -2, 3);
        assert_eq!(t.to_string(), "t:1,-2,3");
        assert_eq!(t.to_string().parse::<CubicTransform>().unwrap(), t);
    }

    #[test]
    fn rotation_group_has_24_proper_and_48_total_elements() {
        let grid = CubicGrid;
        assert_eq!(grid.rotations(false).len(), 24);
        assert_eq!(grid.rotations(true).len(), 48);
    }

    #[test]
    fn scale_transform_matches_repeated_composition() {
        let grid = CubicGrid;
        let quarter_turn = CubicTransform::Rotate { perm: [0, 2, 1], signs: [1, -1, 1] };
        let voxel = [CubicVoxel(1, 2, 0)];

        let twice = grid.scale_transform(quarter_turn, 2);
        let composed_twice =
            grid.apply_transform(quarter_turn, &grid.apply_transform(quarter_turn, &voxel));
        assert_eq!(grid.apply_transform(twice, &voxel), composed_twice);

        let identity = grid.scale_transform(quarter_turn, 4);
        assert_eq!(grid.apply_transform(identity, &voxel), voxel);

        let inverse = grid.scale_transform(quarter_turn, -1);
        assert_eq!(grid.apply_transform(inverse, &grid.apply_transform(quarter_turn, &voxel)), voxel);
    }

    #[test]
    fn vertex_axis_rotation_has_order_three() {
        let grid = CubicGrid;
        let (perm, signs) = rotation_for_axis_phase("v++-", 1).unwrap();
        let t = CubicTransform::Rotate { perm, signs };
        let voxel = [CubicVoxel(1, 2, 3)];
        let once = grid.apply_transform(t, &voxel);
        let twice = grid.apply_transform(t, &once);
        let thrice = grid.apply_transform(t, &twice);
        assert_ne!(once, voxel);
        assert_ne!(twice, voxel);
        assert_eq!(thrice, voxel);
    }

    #[test]
    fn is_separate_detects_face_adjacency_only() {
        let grid = CubicGrid;
        let a = [CubicVoxel(0, 0, 0)];
        assert!(!grid.is_separate(&a, &[CubicVoxel(1, 0, 0)]));
        assert!(grid.is_separate(&a, &[CubicVoxel(1, 1, 0)]), "edge-adjacent voxels are not face-adjacent");
        assert!(grid.is_separate(&a, &[CubicVoxel(5, 5, 5)]));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn voxel_and_transform_round_trip_through_serde() {
        let v = CubicVoxel(1, -2, 3);
        let json = serde_json::to_string(&v).expect("serialize");
        assert_eq!(serde_json::from_str::<CubicVoxel>(&json).unwrap(), v);

        let t = CubicTransform::Translate(1, 0, -1);
        let json = serde_json::to_string(&t).expect("serialize");
        assert_eq!(serde_json::from_str::<CubicTransform>(&json).unwrap(), t);
    }
}
