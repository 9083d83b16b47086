// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::Instant;

use crate::aabb::Aabb;
use crate::approval::approve;
use crate::candidates::{ScoredCandidate, generate_and_score};
use crate::config::PipelineConfig;
use crate::error::StmError;
use crate::grouping::group_by_cell_and_camera;
use crate::neighbours::expand_all_neighbours_uniq;
use crate::raydb::{Ray, RayKey, build_ray_database};
use crate::traversal::{Grid, directional_voxel_traversal};

/// Run counters surfaced alongside the approved matches.
#[derive(Debug, Default, Clone)]
pub struct PipelineCounters {
    pub rays_in: usize,
    pub rays_valid: usize,
    pub rays_missed: usize,
    pub cells_traversed: usize,
    pub groups: usize,
    pub candidates: usize,
    pub approved: usize,
}

/// Complete result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub matches: Vec<ScoredCandidate>,
    pub counters: PipelineCounters,
}

/// Runs the full space-traversal matching pipeline over `rays`.
///
/// Validates `cfg`, clips rays to the bounding box, traverses the voxel
/// grid, groups by cell and camera, generates and scores candidates, and
/// greedily approves the non-conflicting subset.
pub fn run_pipeline(rays: &[Ray], cfg: &PipelineConfig) -> Result<PipelineOutput, StmError> {
    cfg.validate()?;

    let aabb = Aabb::new(cfg.bounding_box);
    let grid = Grid::linspace(cfg.bounding_box, cfg.nx, cfg.ny, cfg.nz);
    let stencil = cfg.neighbours.stencil();

    let t0 = Instant::now();
    let (raydb, valid_rays, counters) = build_ray_database(rays, &aabb)?;
    let rays_valid = valid_rays.len();
    let rays_missed = rays.len() - rays_valid;
    log::info!(
        "ray database built in {:?}: {} valid, {} missed (per-camera valid: {:?})",
        t0.elapsed(),
        rays_valid,
        rays_missed,
        counters.valid_per_camera
    );

    let t1 = Instant::now();
    let mut cells_all: Vec<(i32, i32, i32)> = Vec::new();
    let mut ids_all: Vec<RayKey> = Vec::new();
    for ray in &valid_rays {
        let mut raw_cells = directional_voxel_traversal(&grid, ray.entry_point, ray.unit_dir)
            .unwrap_or_default();
        if ray.inside {
            raw_cells.extend(
                directional_voxel_traversal(&grid, ray.entry_point, -ray.unit_dir)
                    .unwrap_or_default(),
            );
        }
        let expanded = expand_all_neighbours_uniq(&raw_cells, &stencil)?;
        ids_all.extend(std::iter::repeat(ray.key).take(expanded.len()));
        cells_all.extend(expanded);
    }
    log::info!(
        "voxel traversal + neighbourhood expansion done in {:?}: {} cell entries",
        t1.elapsed(),
        cells_all.len()
    );

    let t2 = Instant::now();
    let groups = group_by_cell_and_camera(&cells_all, &ids_all, cfg.cam_match)?;
    log::info!(
        "cell/camera grouping done in {:?}: {} kept groups",
        t2.elapsed(),
        groups.len()
    );

    let t3 = Instant::now();
    let scored = generate_and_score(&groups, &[], &raydb);
    log::info!(
        "candidate generation/scoring done in {:?}: {} scored candidates",
        t3.elapsed(),
        scored.len()
    );

    let t4 = Instant::now();
    let num_candidates = scored.len();
    let approved = approve(scored, cfg.maxdistance, cfg.max_matches_per_ray);
    log::info!(
        "approval done in {:?}: {} of {} candidates approved",
        t4.elapsed(),
        approved.len(),
        num_candidates
    );

    Ok(PipelineOutput {
        counters: PipelineCounters {
            rays_in: rays.len(),
            rays_valid,
            rays_missed,
            cells_traversed: cells_all.len(),
            groups: groups.len(),
            candidates: num_candidates,
            approved: approved.len(),
        },
        matches: approved,
    })
}
