// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use glam::DVec3;

/// Axis-aligned bounding box of the tracking volume, `[[xmin,xmax],
/// [ymin,ymax],[zmin,zmax]]`.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(bounds: [[f64; 2]; 3]) -> Self {
        Self {
            min: DVec3::new(bounds[0][0], bounds[1][0], bounds[2][0]),
            max: DVec3::new(bounds[0][1], bounds[1][1], bounds[2][1]),
        }
    }

    fn contains_strictly(&self, p: DVec3) -> bool {
        p.x > self.min.x
            && p.x < self.max.x
            && p.y > self.min.y
            && p.y < self.max.y
            && p.z > self.min.z
            && p.z < self.max.z
    }
}

/// Result of clipping a ray to the AABB.
#[derive(Debug, Clone, Copy)]
pub struct ClippedRay {
    /// `true` if the ray origin or an entry face was found on the box.
    pub hit: bool,
    /// `true` if the ray originates strictly inside the box.
    pub inside: bool,
    /// The origin (if `inside`) or the first face hit (if not), undefined
    /// when `hit` is `false`.
    pub point: DVec3,
    /// Normalized ray direction.
    pub dir: DVec3,
}

/// `a / b`, with `-infinity` when `b == 0` so a zero direction component can
/// never be selected as the minimum-time face.
fn special_division(a: f64, b: f64) -> f64 {
    if b == 0.0 { f64::NEG_INFINITY } else { a / b }
}

fn at_face(bmin: f64, bmax: f64, coord: f64) -> bool {
    bmin <= coord && coord <= bmax
}

/// Projects a ray `(origin, direction)` onto `aabb`.
///
/// If `origin` lies strictly inside the box, returns `inside = true` at
/// `point = origin`. Otherwise computes the six slab-plane crossing times
/// and picks the earliest (by arrival time, including negative times) that
/// lands on the corresponding face; ties break by iteration order
/// `xmin,xmax,ymin,ymax,zmin,zmax`. Returns `hit = false` if no face is
/// crossed.
pub fn prepare_ray(origin: DVec3, direction: DVec3, aabb: &Aabb) -> ClippedRay {
    let dir = direction.normalize();

    if aabb.contains_strictly(origin) {
        return ClippedRay {
            hit: true,
            inside: true,
            point: origin,
            dir,
        };
    }

    let times = [
        special_division(aabb.min.x - origin.x, dir.x),
        special_division(aabb.max.x - origin.x, dir.x),
        special_division(aabb.min.y - origin.y, dir.y),
        special_division(aabb.max.y - origin.y, dir.y),
        special_division(aabb.min.z - origin.z, dir.z),
        special_division(aabb.max.z - origin.z, dir.z),
    ];

    // Point at arrival time `t`; an infinite `t` (zero-component axis) maps
    // to an all-infinite point, guaranteeing it never passes `at_face`.
    let point_at = |t: f64| -> DVec3 {
        if t.is_infinite() {
            DVec3::splat(t.signum() * f64::INFINITY)
        } else {
            origin + dir * t
        }
    };

    // Per-axis face checks, in the tie-break order mandated by the spec:
    // xmin, xmax, ymin, ymax, zmin, zmax.
    let candidates: [(f64, bool); 6] = [
        (times[0], {
            let p = point_at(times[0]);
            at_face(aabb.min.y, aabb.max.y, p.y) && at_face(aabb.min.z, aabb.max.z, p.z)
        }),
        (times[1], {
            let p = point_at(times[1]);
            at_face(aabb.min.y, aabb.max.y, p.y) && at_face(aabb.min.z, aabb.max.z, p.z)
        }),
        (times[2], {
            let p = point_at(times[2]);
            at_face(aabb.min.x, aabb.max.x, p.x) && at_face(aabb.min.z, aabb.max.z, p.z)
        }),
        (times[3], {
            let p = point_at(times[3]);
            at_face(aabb.min.x, aabb.max.x, p.x) && at_face(aabb.min.z, aabb.max.z, p.z)
        }),
        (times[4], {
            let p = point_at(times[4]);
            at_face(aabb.min.x, aabb.max.x, p.x) && at_face(aabb.min.y, aabb.max.y, p.y)
        }),
        (times[5], {
            let p = point_at(times[5]);
            at_face(aabb.min.x, aabb.max.x, p.x) && at_face(aabb.min.y, aabb.max.y, p.y)
        }),
    ];

    let mut best: Option<(f64, DVec3)> = None;
    for &(t, face_hit) in &candidates {
        if face_hit && best.is_none_or(|(best_t, _)| t < best_t) {
            best = Some((t, point_at(t)));
        }
    }

    match best {
        Some((_, point)) => ClippedRay {
            hit: true,
            inside: false,
            point,
            dir,
        },
        None => ClippedRay {
            hit: false,
            inside: false,
            point: DVec3::ZERO,
            dir,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Aabb {
        Aabb::new([[-2.0, 2.0], [-2.0, 2.0], [-2.0, 2.0]])
    }

    #[test]
    fn origin_strictly_inside_returns_self() {
        let aabb = cube();
        let r = prepare_ray(DVec3::new(0.5, 0.0, 0.0), DVec3::X, &aabb);
        assert!(r.hit);
        assert!(r.inside);
        assert_eq!(r.point, DVec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn outside_ray_hits_nearest_face() {
        let aabb = cube();
        let r = prepare_ray(DVec3::new(-10.0, 0.0, 0.0), DVec3::X, &aabb);
        assert!(r.hit);
        assert!(!r.inside);
        assert!((r.point.x - (-2.0)).abs() < 1e-9);
        assert!(r.point.y.abs() < 1e-9);
        assert!(r.point.z.abs() < 1e-9);
    }

    #[test]
    fn ray_missing_box_reports_no_hit() {
        let aabb = Aabb::new([[-1.0, 1.0], [-1.0, 1.0], [-1.0, 1.0]]);
        let r = prepare_ray(DVec3::new(10.0, 10.0, 10.0), DVec3::X, &aabb);
        assert!(!r.hit);
    }

    #[test]
    fn tie_break_prefers_earlier_face_in_iteration_order() {
        // Ray starts exactly on the xmin/ymin corner edge heading into +x,+y;
        // both faces are crossed at the same arrival time (t=0) — xmin wins.
        let aabb = cube();
        let r = prepare_ray(
            DVec3::new(-2.0, -2.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            &aabb,
        );
        assert!(r.hit);
        assert!((r.point.x - (-2.0)).abs() < 1e-9);
    }
}
