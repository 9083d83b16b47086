// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashSet;

use glam::DVec3;

use crate::geometry::{closest_point_many, closest_point_pair};
use crate::grouping::CellGroup;
use crate::raydb::{RayDb, RayKey};

/// A candidate multi-ray tuple with its triangulated position and residual.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub key: Vec<RayKey>,
    pub position: DVec3,
    pub residual: f64,
}

/// Cartesian product of `group.by_camera`'s per-camera lists: one ray picked
/// from each camera present.
fn cartesian_product(lists: &[Vec<RayKey>]) -> Vec<Vec<RayKey>> {
    let mut out: Vec<Vec<RayKey>> = vec![Vec::new()];
    for list in lists {
        let mut next = Vec::with_capacity(out.len() * list.len());
        for prefix in &out {
            for &key in list {
                let mut combo = prefix.clone();
                combo.push(key);
                next.push(combo);
            }
        }
        out = next;
    }
    out
}

/// Builds the deduplicated, sorted global candidate key set from all kept
/// cell groups plus any explicit seed candidates supplied by the caller.
pub fn build_candidate_keys(groups: &[CellGroup], seeds: &[Vec<RayKey>]) -> Vec<Vec<RayKey>> {
    let mut seen: HashSet<Vec<RayKey>> = HashSet::new();
    let mut keys = Vec::new();

    let mut push = |mut candidate: Vec<RayKey>, keys: &mut Vec<Vec<RayKey>>| {
        candidate.sort();
        if seen.insert(candidate.clone()) {
            keys.push(candidate);
        }
    };

    for group in groups {
        for combo in cartesian_product(&group.by_camera) {
            push(combo, &mut keys);
        }
    }
    for seed in seeds {
        push(seed.clone(), &mut keys);
    }

    keys.sort();
    keys
}

/// Scores one candidate: pair solver for exactly 2 rays, N-line least
/// squares for 3 or more. Returns `None` on degenerate geometry (near-
/// parallel pair, or a singular/collinear N-line system) — such candidates
/// are silently excluded from scoring.
pub fn score_candidate(key: &[RayKey], raydb: &RayDb) -> Option<ScoredCandidate> {
    let rays: Vec<(DVec3, DVec3)> = key.iter().map(|k| raydb.get(k)).collect::<Option<_>>()?;

    let (position, residual) = if rays.len() == 2 {
        closest_point_pair(rays[0].0, rays[0].1, rays[1].0, rays[1].1)?
    } else {
        let points: Vec<DVec3> = rays.iter().map(|(p, _)| *p).collect();
        let dirs: Vec<DVec3> = rays.iter().map(|(_, v)| *v).collect();
        closest_point_many(&points, &dirs)?
    };

    Some(ScoredCandidate {
        key: key.to_vec(),
        position,
        residual,
    })
}

/// Builds and scores every candidate, dropping degenerate ones.
pub fn generate_and_score(
    groups: &[CellGroup],
    seeds: &[Vec<RayKey>],
    raydb: &RayDb,
) -> Vec<ScoredCandidate> {
    build_candidate_keys(groups, seeds)
        .iter()
        .filter_map(|key| score_candidate(key, raydb))
        .collect()
}
