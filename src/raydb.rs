// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::{HashMap, HashSet};

use glam::DVec3;

use crate::aabb::{Aabb, prepare_ray};
use crate::error::StmError;

/// Safety threshold above which a distinct-camera count signals malformed
/// input column order.
pub const MAX_CAMERAS: usize = 10;

/// `(camera_id, ray_id)`, globally unique over a run.
pub type RayKey = (i32, i32);

/// A caller-supplied ray, possibly non-unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub cam_id: i32,
    pub ray_id: i32,
    pub origin: DVec3,
    pub direction: DVec3,
}

/// A ray clipped to the AABB, immutable thereafter.
#[derive(Debug, Clone, Copy)]
pub struct ClippedRay {
    pub key: RayKey,
    pub inside: bool,
    pub entry_point: DVec3,
    pub unit_dir: DVec3,
}

/// Read-only `RayKey -> (entry_point, unit_dir)` lookup used by the scorer.
#[derive(Debug, Default, Clone)]
pub struct RayDb {
    entries: HashMap<RayKey, (DVec3, DVec3)>,
}

impl RayDb {
    pub fn get(&self, key: &RayKey) -> Option<(DVec3, DVec3)> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-camera ray counters surfaced after building the database.
#[derive(Debug, Default, Clone)]
pub struct RayCounters {
    pub valid_per_camera: HashMap<i32, u32>,
    pub missed_per_camera: HashMap<i32, u32>,
}

/// Clips every ray in `rays` to `aabb`, builds the [`RayDb`], and returns the
/// surviving [`ClippedRay`]s alongside per-camera counters.
///
/// Fails with [`StmError::TooManyCameras`] if more than [`MAX_CAMERAS`]
/// distinct camera ids are observed.
pub fn build_ray_database(
    rays: &[Ray],
    aabb: &Aabb,
) -> Result<(RayDb, Vec<ClippedRay>, RayCounters), StmError> {
    let mut db = RayDb::default();
    let mut valid = Vec::new();
    let mut counters = RayCounters::default();
    let mut cameras: HashSet<i32> = HashSet::new();

    for ray in rays {
        cameras.insert(ray.cam_id);
        let clipped = prepare_ray(ray.origin, ray.direction, aabb);

        if clipped.hit {
            let key = (ray.cam_id, ray.ray_id);
            db.entries.insert(key, (clipped.point, clipped.dir));
            valid.push(ClippedRay {
                key,
                inside: clipped.inside,
                entry_point: clipped.point,
                unit_dir: clipped.dir,
            });
            *counters.valid_per_camera.entry(ray.cam_id).or_insert(0) += 1;
        } else {
            *counters.missed_per_camera.entry(ray.cam_id).or_insert(0) += 1;
        }
    }

    if cameras.len() > MAX_CAMERAS {
        return Err(StmError::TooManyCameras(cameras.len()));
    }

    Ok((db, valid, counters))
}
