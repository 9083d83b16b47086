// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashSet;

use crate::error::StmError;
use crate::neighbours::encode_cell;
use crate::raydb::RayKey;

/// A kept cell's rays, bucketed by camera (one inner list per distinct
/// camera present, ordered by ascending `cam_id`).
#[derive(Debug, Clone)]
pub struct CellGroup {
    pub by_camera: Vec<Vec<RayKey>>,
}

/// Sorts `(cell, ray_key)` pairs by the cell's bijective key, partitions
/// into maximal same-cell runs, keeps runs with at least `cam_match` rays
/// from at least `cam_match` distinct cameras, and buckets each kept run by
/// camera.
///
/// The final run is flushed unconditionally after the scan loop, so a
/// trailing group can never be dropped by comparison against the previous
/// one.
pub fn group_by_cell_and_camera(
    cells: &[(i32, i32, i32)],
    ids: &[RayKey],
    cam_match: usize,
) -> Result<Vec<CellGroup>, StmError> {
    debug_assert_eq!(cells.len(), ids.len());

    let mut rows: Vec<(i64, RayKey)> = Vec::with_capacity(cells.len());
    for (&cell, &id) in cells.iter().zip(ids) {
        rows.push((encode_cell(cell)?, id));
    }
    rows.sort_by_key(|(key, _)| *key);

    let mut groups = Vec::new();
    let mut run_start = 0usize;

    let mut flush = |start: usize, end: usize, groups: &mut Vec<CellGroup>| {
        let run = &rows[start..end];
        if run.len() < cam_match {
            return;
        }
        let distinct_cams: HashSet<i32> = run.iter().map(|(_, (cam, _))| *cam).collect();
        if distinct_cams.len() < cam_match {
            return;
        }
        groups.push(bucket_by_camera(run));
    };

    for i in 1..rows.len() {
        if rows[i].0 != rows[run_start].0 {
            flush(run_start, i, &mut groups);
            run_start = i;
        }
    }
    if !rows.is_empty() {
        flush(run_start, rows.len(), &mut groups);
    }

    Ok(groups)
}

fn bucket_by_camera(run: &[(i64, RayKey)]) -> CellGroup {
    let mut keys: Vec<RayKey> = run.iter().map(|(_, k)| *k).collect();
    keys.sort_by_key(|(cam, _)| *cam);

    let mut by_camera: Vec<Vec<RayKey>> = Vec::new();
    for key in keys {
        match by_camera.last_mut() {
            Some(last) if last[0].0 == key.0 => last.push(key),
            _ => by_camera.push(vec![key]),
        }
    }
    CellGroup { by_camera }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_below_cam_match_are_dropped() {
        let cells = [(0, 0, 0), (0, 0, 0)];
        let ids = [(0i32, 0i32), (0, 1)]; // same camera twice
        let groups = group_by_cell_and_camera(&cells, &ids, 2).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn groups_with_enough_cameras_are_kept_and_bucketed() {
        let cells = [(1, 1, 1), (1, 1, 1), (1, 1, 1)];
        let ids = [(0, 0), (1, 0), (1, 1)];
        let groups = group_by_cell_and_camera(&cells, &ids, 2).unwrap();
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.by_camera.len(), 2);
        assert_eq!(g.by_camera[0], vec![(0, 0)]);
        assert_eq!(g.by_camera[1], vec![(1, 0), (1, 1)]);
    }

    #[test]
    fn final_run_is_flushed() {
        // Only one distinct cell, must survive loop-end flush.
        let cells = [(2, 2, 2), (2, 2, 2)];
        let ids = [(0, 0), (1, 0)];
        let groups = group_by_cell_and_camera(&cells, &ids, 2).unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn multiple_cells_partition_independently() {
        let cells = [(0, 0, 0), (0, 0, 0), (1, 0, 0), (1, 0, 0)];
        let ids = [(0, 0), (1, 0), (0, 1), (1, 1)];
        let groups = group_by_cell_and_camera(&cells, &ids, 2).unwrap();
        assert_eq!(groups.len(), 2);
    }
}
