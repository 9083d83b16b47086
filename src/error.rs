// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

/// Fatal errors that abort a pipeline run. Non-fatal conditions (a ray
/// missing the bounding box, a degenerate candidate) are counted and logged
/// instead of raised — see [`crate::pipeline::PipelineOutput`].
#[derive(Error, Debug)]
pub enum StmError {
    /// The bounding box, grid size, or neighbourhood stencil is malformed.
    #[error("invalid pipeline configuration: {0}")]
    Config(String),

    /// More distinct cameras were seen than the safety threshold allows,
    /// usually a sign that the input columns are mis-ordered.
    #[error("too many distinct cameras ({0}), check input column order")]
    TooManyCameras(usize),

    /// A cell coordinate exceeded the bijective encoding's range.
    #[error("cell coordinate {coord:?} exceeds the {limit} encoding bound")]
    CoordOverflow { coord: (i32, i32, i32), limit: i32 },
}
