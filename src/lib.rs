// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod aabb;
pub mod approval;
pub mod candidates;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grouping;
pub mod io;
pub mod neighbours;
pub mod pipeline;
pub mod raydb;
pub mod traversal;

pub use candidates::ScoredCandidate;
pub use config::PipelineConfig;
pub use error::StmError;
pub use neighbours::Neighbourhood;
pub use pipeline::{PipelineCounters, PipelineOutput, run_pipeline};
pub use raydb::{Ray, RayKey};
