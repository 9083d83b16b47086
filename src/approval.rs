// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashMap;

use crate::candidates::ScoredCandidate;
use crate::raydb::RayKey;

/// Greedily admits candidates sorted by `(-|candidates|, residual)` —
/// more cameras first, then smaller residual — enforcing the per-ray reuse
/// quota and the residual threshold.
///
/// This is a matroid-style greedy intersection of per-ray capacity
/// constraints; the sort order is what makes it optimal for the stated
/// objective.
pub fn approve(
    mut candidates: Vec<ScoredCandidate>,
    maxdistance: f64,
    max_matches_per_ray: usize,
) -> Vec<ScoredCandidate> {
    candidates.sort_by(|a, b| {
        b.key
            .len()
            .cmp(&a.key.len())
            .then(a.residual.partial_cmp(&b.residual).unwrap())
    });

    let mut match_count: HashMap<RayKey, usize> = HashMap::new();
    let mut approved = Vec::new();

    for candidate in candidates {
        if candidate.residual >= maxdistance {
            continue;
        }
        let within_quota = candidate
            .key
            .iter()
            .all(|k| *match_count.get(k).unwrap_or(&0) < max_matches_per_ray);
        if !within_quota {
            continue;
        }

        for k in &candidate.key {
            *match_count.entry(*k).or_insert(0) += 1;
        }
        approved.push(candidate);
    }

    approved
}
