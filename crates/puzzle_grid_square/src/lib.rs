//! Square 2-D grid: the simplest [`puzzle_core::Grid`] implementation,
//! voxels on the integer lattice `Z^2` with 4-adjacency.
//!
//! Voxels print as `"x,y"`; transforms print as `"t:dx,dy"` for a
//! translation or `"r:<phase>"` for one of the 8 elements of the dihedral
//! group of the square, `phase` running 0..=3 for the proper rotations
//! (identity, 90, 180, 270 degrees counterclockwise) and 4..=7 for the
//! mirrored ones.

use std::fmt;
use std::str::FromStr;

use puzzle_core::Grid;

/// A cell of the square grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquareVoxel(pub i32, pub i32);

impl fmt::Display for SquareVoxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}

impl FromStr for SquareVoxel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s.split_once(',').ok_or(ParseError::Malformed)?;
        let x = x.trim().parse().map_err(|_| ParseError::Malformed)?;
        let y = y.trim().parse().map_err(|_| ParseError::Malformed)?;
        Ok(SquareVoxel(x, y))
    }
}

/// A transform of the square grid: one of the 8 elements of the dihedral
/// group of the square, about the origin, or a pure translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SquareTransform {
    /// `(x, y) -> (sx * x, sy * y)`, then swap axes if `swap`.
    Rotate { swap: bool, sx: i32, sy: i32 },
    Translate(i32, i32),
}

/// The 8 elements of the dihedral group, in the order `rotation_phase`
/// indexes into: 0..=3 proper, 4..=7 mirrored.
const ROTATION_PHASES: [SquareTransform; 8] = [
    SquareTransform::Rotate { swap: false, sx: 1, sy: 1 },
    SquareTransform::Rotate { swap: true, sx: 1, sy: -1 },
    SquareTransform::Rotate { swap: false, sx: -1, sy: -1 },
    SquareTransform::Rotate { swap: true, sx: -1, sy: 1 },
    SquareTransform::Rotate { swap: false, sx: -1, sy: 1 },
    SquareTransform::Rotate { swap: false, sx: 1, sy: -1 },
    SquareTransform::Rotate { swap: true, sx: 1, sy: 1 },
    SquareTransform::Rotate { swap: true, sx: -1, sy: -1 },
];

fn rotation_phase(t: SquareTransform) -> Option<usize> {
    ROTATION_PHASES.iter().position(|&r| r == t)
}

impl fmt::Display for SquareTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SquareTransform::Translate(dx, dy) => write!(f, "t:{dx},{dy}"),
            SquareTransform::Rotate { .. } => {
                let phase = rotation_phase(*self).expect("every Rotate value is one of the 8 listed phases");
                write!(f, "r:{phase}")
            }
        }
    }
}

impl FromStr for SquareTransform {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("t:") {
            let (dx, dy) = rest.split_once(',').ok_or(ParseError::Malformed)?;
            let dx = dx.trim().parse().map_err(|_| ParseError::Malformed)?;
            let dy = dy.trim().parse().map_err(|_| ParseError::Malformed)?;
            return Ok(SquareTransform::Translate(dx, dy));
        }
        if let Some(rest) = s.strip_prefix("r:") {
            let phase: usize = rest.trim().parse().map_err(|_| ParseError::Malformed)?;
            return ROTATION_PHASES.get(phase).copied().ok_or(ParseError::BadPhase(phase));
        }
        Err(ParseError::Malformed)
    }
}

/// Error parsing a [`SquareVoxel`] or [`SquareTransform`] from its string
/// syntax.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("malformed square-grid token")]
    Malformed,
    #[error("rotation phase {0} out of range, expected 0..=7")]
    BadPhase(usize),
}

/// The square 2-D grid. Zero-sized: all the geometry is in the associated
/// types, this is just a handle to call [`Grid`] methods on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquareGrid;

impl SquareGrid {
    fn compose(&self, outer: SquareTransform, inner: SquareTransform) -> SquareTransform {
        match (outer, inner) {
            (
                SquareTransform::Rotate { swap: s1, sx: a1, sy: b1 },
                SquareTransform::Rotate { swap: s2, sx: a2, sy: b2 },
            ) => {
                let (ix, iy) = (a2, b2);
                let (mx, my) = if s2 { (iy, ix) } else { (ix, iy) };
                let (ox, oy) = (mx * a1, my * b1);
                if s1 {
                    SquareTransform::Rotate { swap: true, sx: oy, sy: ox }
                } else {
                    SquareTransform::Rotate { swap: false, sx: ox, sy: oy }
                }
            }
            _ => panic!("compose is only defined between two rotations"),
        }
    }

    fn invert(&self, t: SquareTransform) -> SquareTransform {
        match t {
            SquareTransform::Translate(dx, dy) => SquareTransform::Translate(-dx, -dy),
            SquareTransform::Rotate { .. } => ROTATION_PHASES
                .iter()
                .copied()
                .find(|&candidate| self.compose(t, candidate) == ROTATION_PHASES[0])
                .expect("the dihedral group of the square is closed under inversion"),
        }
    }
}

impl Grid for SquareGrid {
    type Voxel = SquareVoxel;
    type Transform = SquareTransform;
    type Bounds = (i32, i32, i32, i32);

    fn voxels_in_bounds(&self, bounds: &Self::Bounds) -> Vec<Self::Voxel> {
        let (x0, y0, x1, y1) = *bounds;
        (x0..=x1).flat_map(|x| (y0..=y1).map(move |y| SquareVoxel(x, y))).collect()
    }

    fn voxel_bounds(&self, voxels: &[Self::Voxel]) -> Self::Bounds {
        let x0 = voxels.iter().map(|v| v.0).min().expect("non-empty");
        let x1 = voxels.iter().map(|v| v.0).max().expect("non-empty");
        let y0 = voxels.iter().map(|v| v.1).min().expect("non-empty");
        let y1 = voxels.iter().map(|v| v.1).max().expect("non-empty");
        (x0, y0, x1, y1)
    }

    fn bounds_union(&self, bounds: &[Self::Bounds]) -> Self::Bounds {
        let x0 = bounds.iter().map(|b| b.0).min().expect("non-empty");
        let y0 = bounds.iter().map(|b| b.1).min().expect("non-empty");
        let x1 = bounds.iter().map(|b| b.2).max().expect("non-empty");
        let y1 = bounds.iter().map(|b| b.3).max().expect("non-empty");
        (x0, y0, x1, y1)
    }

    fn bounds_origin(&self, bounds: &Self::Bounds) -> Self::Voxel {
        SquareVoxel(bounds.0, bounds.1)
    }

    fn apply_transform(&self, t: Self::Transform, voxels: &[Self::Voxel]) -> Vec<Self::Voxel> {
        match t {
            SquareTransform::Rotate { swap, sx, sy } => voxels
                .iter()
                .map(|v| {
                    let (x, y) = (v.0 * sx, v.1 * sy);
                    if swap { SquareVoxel(y, x) } else { SquareVoxel(x, y) }
                })
                .collect(),
            SquareTransform::Translate(dx, dy) => {
                voxels.iter().map(|v| SquareVoxel(v.0 + dx, v.1 + dy)).collect()
            }
        }
    }

    fn scale_transform(&self, t: Self::Transform, n: i32) -> Self::Transform {
        match t {
            SquareTransform::Translate(dx, dy) => SquareTransform::Translate(dx * n, dy * n),
            SquareTransform::Rotate { .. } => {
                let base = if n < 0 { self.invert(t) } else { t };
                let mut result = ROTATION_PHASES[0];
                for _ in 0..n.unsigned_abs() {
                    result = self.compose(result, base);
                }
                result
            }
        }
    }

    fn rotations(&self, include_mirrors: bool) -> Vec<Self::Transform> {
        if include_mirrors { ROTATION_PHASES.to_vec() } else { ROTATION_PHASES[0..4].to_vec() }
    }

    fn translation(&self, from: Self::Voxel, to: Self::Voxel) -> Self::Transform {
        SquareTransform::Translate(to.0 - from.0, to.1 - from.1)
    }

    fn disassembly_transforms(&self) -> Vec<Self::Transform> {
        vec![
            SquareTransform::Translate(1, 0),
            SquareTransform::Translate(-1, 0),
            SquareTransform::Translate(0, 1),
            SquareTransform::Translate(0, -1),
        ]
    }

    fn is_separate(&self, a: &[Self::Voxel], b: &[Self::Voxel]) -> bool {
        use std::collections::HashSet;
        let a_set: HashSet<SquareVoxel> = a.iter().copied().collect();
        for v in b {
            if a_set.contains(v) {
                return false;
            }
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                if a_set.contains(&SquareVoxel(v.0 + dx, v.1 + dy)) {
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
        let v = SquareVoxel(-3, 4);
        let s = v.to_string();
        assert_eq!(s, "-3,4");
        assert_eq!(s.parse::<SquareVoxel>().unwrap(), v);
    }

    #[test]
    fn transform_round_trips_through_its_string_syntax() {
        for t in ROTATION_PHASES {
            assert_eq!(t.to_string().parse::<SquareTransform>().unwrap(), t);
        }
        let t = SquareTransform::Translate(2, -5);
        assert_eq!(t.to_string(), "t:2,-5");
        assert_eq!(t.to_string().parse::<SquareTransform>().unwrap(), t);
    }

    #[test]
    fn scale_transform_matches_repeated_composition() {
        let grid = SquareGrid;
        let quarter_turn = SquareTransform::Rotate { swap: true, sx: 1, sy: -1 };
        let voxel = [SquareVoxel(1, 0)];

        let scaled_twice = grid.scale_transform(quarter_turn, 2);
        let applied_twice = grid.apply_transform(scaled_twice, &voxel);
        let composed_twice =
            grid.apply_transform(quarter_turn, &grid.apply_transform(quarter_turn, &voxel));
        assert_eq!(applied_twice, composed_twice);

        let identity = grid.scale_transform(quarter_turn, 4);
        assert_eq!(grid.apply_transform(identity, &voxel), voxel);

        let inverse = grid.scale_transform(quarter_turn, -1);
        assert_eq!(grid.apply_transform(inverse, &grid.apply_transform(quarter_turn, &voxel)), voxel);
    }

    #[test]
    fn rotation_group_is_closed_and_sized_correctly() {
        let grid = SquareGrid;
        assert_eq!(grid.rotations(false).len(), 4);
        assert_eq!(grid.rotations(true).len(), 8);

        let voxels = [SquareVoxel(2, 1), SquareVoxel(3, 1)];
        for t in grid.rotations(true) {
            let transformed = grid.apply_transform(t, &voxels);
            assert_eq!(transformed.len(), voxels.len());
        }
    }

    #[test]
    fn is_separate_detects_orthogonal_adjacency_only() {
        let grid = SquareGrid;
        let a = [SquareVoxel(0, 0)];
        assert!(!grid.is_separate(&a, &[SquareVoxel(1, 0)]));
        assert!(!grid.is_separate(&a, &[SquareVoxel(0, 0)]));
        assert!(grid.is_separate(&a, &[SquareVoxel(1, 1)]), "diagonal neighbors are not adjacent");
        assert!(grid.is_separate(&a, &[SquareVoxel(5, 5)]));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn voxel_and_transform_round_trip_through_serde() {
        let v = SquareVoxel(2, -7);
        let json = serde_json::to_string(&v).expect("serialize");
        let back: SquareVoxel = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, v);

        let t = SquareTransform::Rotate { swap: true, sx: 1, sy: -1 };
        let json = serde_json::to_string(&t).expect("serialize");
        let back: SquareTransform = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, t);
    }

    #[test]
    fn disassembly_transforms_are_the_four_unit_axis_translations() {
        let grid = SquareGrid;
        let mut transforms = grid.disassembly_transforms();
        transforms.sort_by_key(|t| match t {
            SquareTransform::Translate(dx, dy) => (*dx, *dy),
            _ => unreachable!(),
        });
        assert_eq!(
            transforms,
            vec![
                SquareTransform::Translate(-1, 0),
                SquareTransform::Translate(0, -1),
                SquareTransform::Translate(0, 1),
                SquareTransform::Translate(1, 0),
            ]
        );
    }
}
