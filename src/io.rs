// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use anyhow::{Context, Result};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::candidates::ScoredCandidate;
use crate::raydb::Ray;

/// One row of a ray input file: `(cam_id, ray_id, ox, oy, oz, vx, vy, vz)`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
struct RayRecord {
    cam_id: i32,
    ray_id: i32,
    ox: f64,
    oy: f64,
    oz: f64,
    vx: f64,
    vy: f64,
    vz: f64,
}

impl From<RayRecord> for Ray {
    fn from(r: RayRecord) -> Self {
        Ray {
            cam_id: r.cam_id,
            ray_id: r.ray_id,
            origin: DVec3::new(r.ox, r.oy, r.oz),
            direction: DVec3::new(r.vx, r.vy, r.vz),
        }
    }
}

/// Reads a headerless CSV of `(cam_id, ray_id, ox, oy, oz, vx, vy, vz)` rows.
pub fn read_rays(path: &Path) -> Result<Vec<Ray>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open ray file: {}", path.display()))?;

    let mut rays = Vec::new();
    for row in reader.deserialize() {
        let record: RayRecord =
            row.with_context(|| format!("Failed to parse ray row in {}", path.display()))?;
        rays.push(record.into());
    }

    log::info!("Loaded {} rays from {}", rays.len(), path.display());
    Ok(rays)
}

/// One row of a match output file: the sorted `RayKey` tuple, the
/// triangulated position, and the residual.
#[derive(Debug, Clone, Serialize)]
struct MatchRecord {
    keys: String,
    x: f64,
    y: f64,
    z: f64,
    residual: f64,
}

impl From<&ScoredCandidate> for MatchRecord {
    fn from(c: &ScoredCandidate) -> Self {
        let keys = c
            .key
            .iter()
            .map(|(cam, ray)| format!("{cam}:{ray}"))
            .collect::<Vec<_>>()
            .join("|");
        MatchRecord {
            keys,
            x: c.position.x,
            y: c.position.y,
            z: c.position.z,
            residual: c.residual,
        }
    }
}

/// Writes approved matches as CSV: `keys,x,y,z,residual`.
pub fn write_matches(path: &Path, matches: &[ScoredCandidate]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to create match file: {}", path.display()))?;

    for m in matches {
        writer
            .serialize(MatchRecord::from(m))
            .with_context(|| format!("Failed to write match to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush match file: {}", path.display()))?;

    log::info!("Wrote {} matches to {}", matches.len(), path.display());
    Ok(())
}
