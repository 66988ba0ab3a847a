//! A minimal square 2-D grid used only by this crate's own tests.
//!
//! This is deliberately *not* `puzzle_grid_square` — that crate is a real,
//! serialisable `Grid` implementation consumed by `puzzle_cli`. This module
//! exists so `puzzle_solver`'s tests don't need a dependency on any grid
//! crate, the same way `puzzle_core::tests` has its own throwaway `LineGrid`.

#![cfg(test)]

use std::collections::HashSet;

use puzzle_core::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Voxel2D(pub i32, pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform2D {
    /// `(x, y) -> (sx * x, sy * y)` then swap axes if `swap`, i.e. one of the
    /// 8 elements of the dihedral group of the square, about the origin.
    Rotate { swap: bool, sx: i32, sy: i32 },
    Translate(i32, i32),
}

pub struct Grid2D;

impl Grid2D {
    /// The 8-element dihedral group (4 without mirrors).
    fn symmetries(include_mirrors: bool) -> Vec<Transform2D> {
        let mut out = vec![
            Transform2D::Rotate { swap: false, sx: 1, sy: 1 },
            Transform2D::Rotate { swap: false, sx: -1, sy: -1 },
            Transform2D::Rotate { swap: true, sx: 1, sy: -1 },
            Transform2D::Rotate { swap: true, sx: -1, sy: 1 },
        ];
        if include_mirrors {
            out.extend([
                Transform2D::Rotate { swap: false, sx: -1, sy: 1 },
                Transform2D::Rotate { swap: false, sx: 1, sy: -1 },
                Transform2D::Rotate { swap: true, sx: 1, sy: 1 },
                Transform2D::Rotate { swap: true, sx: -1, sy: -1 },
            ]);
        }
        out
    }
}

impl Grid for Grid2D {
    type Voxel = Voxel2D;
    type Transform = Transform2D;
    type Bounds = (i32, i32, i32, i32);

    fn voxels_in_bounds(&self, bounds: &Self::Bounds) -> Vec<Self::Voxel> {
        let (x0, y0, x1, y1) = *bounds;
        (x0..=x1)
            .flat_map(|x| (y0..=y1).map(move |y| Voxel2D(x, y)))
            .collect()
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
        Voxel2D(bounds.0, bounds.1)
    }

    fn apply_transform(&self, t: Self::Transform, voxels: &[Self::Voxel]) -> Vec<Self::Voxel> {
        match t {
            Transform2D::Rotate { swap, sx, sy } => voxels
                .iter()
                .map(|v| {
                    let (x, y) = (v.0 * sx, v.1 * sy);
                    if swap { Voxel2D(y, x) } else { Voxel2D(x, y) }
                })
                .collect(),
            Transform2D::Translate(dx, dy) => {
                voxels.iter().map(|v| Voxel2D(v.0 + dx, v.1 + dy)).collect()
            }
        }
    }

    fn scale_transform(&self, t: Self::Transform, n: i32) -> Self::Transform {
        match t {
            Transform2D::Translate(dx, dy) => Transform2D::Translate(dx * n, dy * n),
            Transform2D::Rotate { .. } => {
                let mut result = Transform2D::Rotate { swap: false, sx: 1, sy: 1 };
                let base = if n < 0 { self.invert(t) } else { t };
                for _ in 0..n.unsigned_abs() {
                    result = self.compose(result, base);
                }
                result
            }
        }
    }

    fn rotations(&self, include_mirrors: bool) -> Vec<Self::Transform> {
        Self::symmetries(include_mirrors)
    }

    fn translation(&self, from: Self::Voxel, to: Self::Voxel) -> Self::Transform {
        Transform2D::Translate(to.0 - from.0, to.1 - from.1)
    }

    fn disassembly_transforms(&self) -> Vec<Self::Transform> {
        vec![
            Transform2D::Translate(1, 0),
            Transform2D::Translate(-1, 0),
            Transform2D::Translate(0, 1),
            Transform2D::Translate(0, -1),
        ]
    }

    fn is_separate(&self, a: &[Self::Voxel], b: &[Self::Voxel]) -> bool {
        let a_set: HashSet<Voxel2D> = a.iter().copied().collect();
        for v in b {
            if a_set.contains(v) {
                return false;
            }
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                if a_set.contains(&Voxel2D(v.0 + dx, v.1 + dy)) {
                    return false;
                }
            }
        }
        true
    }
}

impl Grid2D {
    fn compose(&self, outer: Transform2D, inner: Transform2D) -> Transform2D {
        match (outer, inner) {
            (
                Transform2D::Rotate { swap: s1, sx: a1, sy: b1 },
                Transform2D::Rotate { swap: s2, sx: a2, sy: b2 },
            ) => {
                // Apply inner then outer to a symbolic (x, y).
                let (ix, iy) = (a2, b2);
                let (mx, my) = if s2 { (iy, ix) } else { (ix, iy) };
                let (ox, oy) = (mx * a1, my * b1);
                if s1 {
                    Transform2D::Rotate { swap: true, sx: oy, sy: ox }
                } else {
                    Transform2D::Rotate { swap: false, sx: ox, sy: oy }
                }
            }
            _ => panic!("compose only defined for rotations in this test grid"),
        }
    }

    fn invert(&self, t: Transform2D) -> Transform2D {
        // Every element of the dihedral group of the square is an involution
        // or has order 4; brute-force the inverse by search since the group
        // is tiny.
        for candidate in Self::symmetries(true) {
            if self.compose(t, candidate) == (Transform2D::Rotate { swap: false, sx: 1, sy: 1 }) {
                return candidate;
            }
        }
        panic!("no inverse found")
    }
}
