// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use glam::DVec3;

use crate::geometry::{find_bin, sign};

/// Per-axis strictly increasing boundary sequences, length `n+1` each.
#[derive(Debug, Clone)]
pub struct Grid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl Grid {
    /// `linspace(min, max, n+1)` per axis.
    pub fn linspace(bounds: [[f64; 2]; 3], nx: u32, ny: u32, nz: u32) -> Self {
        Self {
            x: linspace(bounds[0][0], bounds[0][1], nx),
            y: linspace(bounds[1][0], bounds[1][1], ny),
            z: linspace(bounds[2][0], bounds[2][1], nz),
        }
    }

    fn axes(&self) -> [&[f64]; 3] {
        [&self.x, &self.y, &self.z]
    }

    /// Locates the `(ix, iy, iz)` cell containing `point`, or `None` if any
    /// axis falls outside the grid.
    pub fn locate(&self, point: DVec3) -> Option<(i32, i32, i32)> {
        let ix = find_bin(&self.x, point.x);
        let iy = find_bin(&self.y, point.y);
        let iz = find_bin(&self.z, point.z);
        if ix < 0 || iy < 0 || iz < 0 {
            None
        } else {
            Some((ix, iy, iz))
        }
    }
}

fn linspace(min: f64, max: f64, n: u32) -> Vec<f64> {
    let n = n as usize;
    let step = (max - min) / n as f64;
    (0..=n)
        .map(|i| if i == n { max } else { min + step * i as f64 })
        .collect()
}

/// Produces the ordered list of cells visited by a ray starting at `point`
/// (on the grid boundary or strictly inside) moving along unit `dir`.
///
/// Returns `None` if `dir` is the zero vector or `point` falls outside the
/// grid — the caller is expected to have validated both via [`prepare_ray`]
/// and [`Grid::locate`].
///
/// [`prepare_ray`]: crate::aabb::prepare_ray
pub fn directional_voxel_traversal(
    grid: &Grid,
    point: DVec3,
    dir: DVec3,
) -> Option<Vec<(i32, i32, i32)>> {
    if dir == DVec3::ZERO {
        return None;
    }
    let start = grid.locate(point)?;

    let point_axes = [point.x, point.y, point.z];
    let dir_axes = [dir.x, dir.y, dir.z];

    // Per-axis positive crossing times.
    let mut axis_times: Vec<(usize, Vec<f64>)> = Vec::with_capacity(3);
    for (axis, boundaries) in grid.axes().into_iter().enumerate() {
        let d = dir_axes[axis];
        if d == 0.0 {
            continue;
        }
        let times: Vec<f64> = boundaries
            .iter()
            .map(|&b| (b - point_axes[axis]) / d)
            .filter(|&t| t > 0.0)
            .collect();
        axis_times.push((axis, times));
    }

    let exit_time = axis_times
        .iter()
        .filter_map(|(_, times)| times.iter().cloned().fold(None, |acc, t| {
            Some(acc.map_or(t, |m: f64| m.max(t)))
        }))
        .fold(f64::INFINITY, f64::min);

    let mut events: Vec<(f64, usize)> = Vec::new();
    for (axis, times) in &axis_times {
        for &t in times {
            if t < exit_time {
                events.push((t, *axis));
            }
        }
    }
    events.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let mut cell = start;
    let mut out = Vec::with_capacity(events.len() + 1);
    out.push(cell);
    for (_, axis) in events {
        let step = sign(dir_axes[axis]) as i32;
        match axis {
            0 => cell.0 += step,
            1 => cell.1 += step,
            _ => cell.2 += step,
        }
        out.push(cell);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid() -> Grid {
        Grid::linspace([[0.0, 5.0], [0.0, 5.0], [0.0, 5.0]], 5, 5, 5)
    }

    #[test]
    fn consecutive_cells_differ_by_one_axis() {
        let grid = unit_grid();
        let cells =
            directional_voxel_traversal(&grid, DVec3::new(0.5, 0.5, 0.5), DVec3::new(1.0, 0.3, 0.1))
                .unwrap();
        for pair in cells.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let d = ((b.0 - a.0).abs(), (b.1 - a.1).abs(), (b.2 - a.2).abs());
            let total = d.0 + d.1 + d.2;
            assert_eq!(total, 1, "cells {a:?} -> {b:?} should differ in exactly one axis");
        }
    }

    #[test]
    fn straight_axis_aligned_ray_visits_every_cell() {
        let grid = unit_grid();
        let cells =
            directional_voxel_traversal(&grid, DVec3::new(0.5, 0.5, 0.5), DVec3::X).unwrap();
        assert_eq!(cells.len(), 5);
        for (i, c) in cells.iter().enumerate() {
            assert_eq!(*c, (i as i32, 0, 0));
        }
    }

    #[test]
    fn zero_direction_is_rejected() {
        let grid = unit_grid();
        assert!(directional_voxel_traversal(&grid, DVec3::new(0.5, 0.5, 0.5), DVec3::ZERO).is_none());
    }
}
