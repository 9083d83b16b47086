// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use glam::{DMat3, DVec3};

/// Tolerance used by [`find_bin`] for equality against the first grid
/// boundary.
pub const BIN_EPS: f64 = 1e-8;

/// Tolerance on `c*c - 4` below which two ray directions are treated as
/// parallel and rejected by [`closest_point_pair`].
pub const PARALLEL_EPS: f64 = 1e-9;

/// Tolerance on the determinant of the normal-equations matrix below which
/// [`closest_point_many`] treats the direction set as collinear/degenerate.
pub const SINGULAR_EPS: f64 = 1e-12;

/// Perpendicular-distance tolerance, used only in the near-parallel branch
/// of [`closest_point_pair`], below which two parallel rays are treated as
/// lying on the exact same line rather than as a genuinely degenerate pair.
pub const COINCIDENT_EPS: f64 = 1e-9;

/// `-1` for negative inputs, `+1` otherwise (including zero).
pub fn sign(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

/// Locates the bin index `i` such that `boundaries[i] <= value <=
/// boundaries[i+1]` in a strictly increasing sequence of length `n+1`.
///
/// Returns `-1` when `value` lies strictly outside `[boundaries[0],
/// boundaries[n]]`. Ties at an interior boundary resolve to the lower bin
/// (greedy left); equality with the very first boundary is tolerated within
/// [`BIN_EPS`]. Runs in `O(log n)`.
pub fn find_bin(boundaries: &[f64], value: f64) -> i32 {
    let n = boundaries.len() - 1;

    if (boundaries[0] - value).abs() < BIN_EPS {
        return 0;
    }
    if value < boundaries[0] || value > boundaries[n] {
        return -1;
    }

    let mut lo = 0usize;
    let mut hi = n;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if value > boundaries[mid] {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo as i32
}

/// Analytic closest-point solution for two lines with unit directions.
///
/// Returns `(midpoint of the two foot-points, cross-product residual)`.
/// Returns `None` when `v1` and `v2` are near-parallel (`|c*c - 4| <=
/// PARALLEL_EPS`) and do not coincide, per §9's resolution of the
/// original's unchecked division. The one exception: rays that are
/// parallel *and* lie on the same line (perpendicular separation within
/// [`COINCIDENT_EPS`]) have a well-defined, unambiguous zero-residual
/// solution and are not degenerate — this is what makes the textbook
/// "two rays aimed at each other along the same line" case score cleanly.
pub fn closest_point_pair(p1: DVec3, v1: DVec3, p2: DVec3, v2: DVec3) -> Option<(DVec3, f64)> {
    let b = 2.0 * (p1 - p2).dot(v1);
    let c = 2.0 * v1.dot(v2);
    let d = 2.0 * (p2 - p1).dot(v2);

    let denom = c * c - 4.0;
    if denom.abs() <= PARALLEL_EPS {
        let perpendicular_gap = v1.cross(p2 - p1).length();
        if perpendicular_gap <= COINCIDENT_EPS {
            return Some(((p1 + p2) * 0.5, 0.0));
        }
        return None;
    }

    let s = (2.0 * d + b * c) / denom;
    let t = (c * s - b) / 2.0;

    let sol = (p1 + t * v1 + p2 + s * v2) * 0.5;
    let residual = v1.cross(p1 - sol).length();
    Some((sol, residual))
}

/// Least-squares closest point to `N >= 3` lines with unit directions.
///
/// Solves `L*x = r` where `L = N*I - sum(v_i v_i^T)` and `r = sum(p_i -
/// (p_i . v_i) v_i)`. Returns `None` when `L` is singular (a collinear
/// direction set), matching `DegenerateGeometry` in the error model.
pub fn closest_point_many(points: &[DVec3], dirs: &[DVec3]) -> Option<(DVec3, f64)> {
    debug_assert_eq!(points.len(), dirs.len());
    let n = points.len() as f64;

    let mut l = DMat3::from_diagonal(DVec3::splat(n));
    let mut r = DVec3::ZERO;
    for (&p, &v) in points.iter().zip(dirs) {
        l -= DMat3::from_cols(v.x * v, v.y * v, v.z * v);
        r += p - p.dot(v) * v;
    }

    if l.determinant().abs() < SINGULAR_EPS {
        return None;
    }

    let x = l.inverse() * r;
    let sum_sq: f64 = points
        .iter()
        .zip(dirs)
        .map(|(&p, &v)| v.cross(x - p).length_squared())
        .sum();
    let residual = (sum_sq / n).sqrt();
    Some((x, residual))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_zero_is_positive() {
        assert_eq!(sign(0.0), 1.0);
        assert_eq!(sign(-0.5), -1.0);
        assert_eq!(sign(3.0), 1.0);
    }

    #[test]
    fn find_bin_interior_boundary_is_greedy_left() {
        let b = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(find_bin(&b, 2.0), 1);
        assert_eq!(find_bin(&b, 0.0), 0);
        assert_eq!(find_bin(&b, 3.5), 3);
        assert_eq!(find_bin(&b, 4.0), 3);
    }

    #[test]
    fn find_bin_outside_range_is_negative_one() {
        let b = [0.0, 1.0, 2.0];
        assert_eq!(find_bin(&b, -0.1), -1);
        assert_eq!(find_bin(&b, 2.1), -1);
    }

    #[test]
    fn closest_point_pair_perfect_intersection() {
        let p1 = DVec3::new(-1.0, 0.0, 0.0);
        let v1 = DVec3::new(1.0, 0.0, 0.0);
        let p2 = DVec3::new(1.0, 0.0, 0.0);
        let v2 = DVec3::new(-1.0, 0.0, 0.0);
        let (sol, residual) = closest_point_pair(p1, v1, p2, v2).unwrap();
        assert!(sol.abs_diff_eq(DVec3::ZERO, 1e-9));
        assert!(residual < 1e-9);
    }

    #[test]
    fn closest_point_pair_skew_rays() {
        let p1 = DVec3::new(0.0, 0.0, 0.0);
        let v1 = DVec3::new(1.0, 0.0, 0.0);
        let p2 = DVec3::new(0.0, 1.0, 1.0);
        let v2 = DVec3::new(0.0, 0.0, -1.0);
        let (sol, residual) = closest_point_pair(p1, v1, p2, v2).unwrap();
        assert!(sol.abs_diff_eq(DVec3::new(0.0, 0.5, 0.5), 1e-6));
        assert!((residual - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn closest_point_pair_coincident_rays_score_zero() {
        // Two rays on the same x-axis line, aimed at each other.
        let p1 = DVec3::new(1.0, 0.0, 0.0);
        let v1 = DVec3::new(-1.0, 0.0, 0.0);
        let p2 = DVec3::new(-1.0, 0.0, 0.0);
        let v2 = DVec3::new(1.0, 0.0, 0.0);
        let (sol, residual) = closest_point_pair(p1, v1, p2, v2).unwrap();
        assert!(sol.abs_diff_eq(DVec3::ZERO, 1e-9));
        assert_eq!(residual, 0.0);
    }

    #[test]
    fn closest_point_pair_rejects_parallel() {
        let p1 = DVec3::new(0.0, 0.0, 0.0);
        let v1 = DVec3::new(1.0, 0.0, 0.0);
        let p2 = DVec3::new(0.0, 1.0, 0.0);
        let v2 = DVec3::new(1.0, 0.0, 0.0);
        assert!(closest_point_pair(p1, v1, p2, v2).is_none());
    }

    #[test]
    fn closest_point_many_agrees_with_pair_for_two_lines() {
        let points = [DVec3::new(0.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 1.0)];
        let dirs = [DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 0.0, -1.0)];
        let (sol_n, res_n) = closest_point_many(&points, &dirs).unwrap();
        let (sol_pair, res_pair) =
            closest_point_pair(points[0], dirs[0], points[1], dirs[1]).unwrap();
        assert!(sol_n.abs_diff_eq(sol_pair, 1e-6));
        assert!((res_n - res_pair).abs() < 1e-6);
    }

    #[test]
    fn closest_point_many_rejects_collinear() {
        let points = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
        ];
        let dirs = [DVec3::X, DVec3::X, DVec3::X];
        assert!(closest_point_many(&points, &dirs).is_none());
    }
}
