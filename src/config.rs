// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::StmError;
use crate::neighbours::Neighbourhood;

/// Minimum grid resolution per axis.
pub const MIN_GRID_SIZE: u32 = 5;

/// Input parameters for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub bounding_box: [[f64; 2]; 3],
    pub nx: u32,
    pub ny: u32,
    pub nz: u32,
    pub cam_match: usize,
    pub max_matches_per_ray: usize,
    pub maxdistance: f64,
    pub neighbours: Neighbourhood,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bounding_box: [[-1.0, 1.0]; 3],
            nx: 75,
            ny: 75,
            nz: 75,
            cam_match: 2,
            max_matches_per_ray: 2,
            maxdistance: 999.9,
            neighbours: Neighbourhood::Six,
        }
    }
}

impl PipelineConfig {
    /// Checks bounding-box ordering and minimum grid resolution before any
    /// expensive work starts.
    pub fn validate(&self) -> Result<(), StmError> {
        for (axis, bounds) in self.bounding_box.iter().enumerate() {
            if !(bounds[0] < bounds[1]) {
                return Err(StmError::Config(format!(
                    "bounding box axis {axis} must have min < max, got {bounds:?}"
                )));
            }
        }
        if self.nx < MIN_GRID_SIZE || self.ny < MIN_GRID_SIZE || self.nz < MIN_GRID_SIZE {
            return Err(StmError::Config(format!(
                "grid resolution ({}, {}, {}) must be >= {MIN_GRID_SIZE} per axis",
                self.nx, self.ny, self.nz
            )));
        }
        if self.cam_match < 2 {
            return Err(StmError::Config(
                "cam_match must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}
