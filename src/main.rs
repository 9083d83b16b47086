// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use stm_core::{Neighbourhood, PipelineConfig, io, run_pipeline};

/// Space-traversal matching: finds triangulated 3D particle positions from
/// multi-camera ray sets.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Headerless CSV of (cam_id, ray_id, ox, oy, oz, vx, vy, vz) rows.
    input: PathBuf,

    /// Destination CSV for approved matches.
    output: PathBuf,

    #[arg(long, allow_hyphen_values = true, num_args = 6, value_names = ["XMIN", "XMAX", "YMIN", "YMAX", "ZMIN", "ZMAX"])]
    bounding_box: Vec<f64>,

    #[arg(long, default_value_t = 75)]
    nx: u32,
    #[arg(long, default_value_t = 75)]
    ny: u32,
    #[arg(long, default_value_t = 75)]
    nz: u32,

    #[arg(long, default_value_t = 2)]
    cam_match: usize,

    #[arg(long, default_value_t = 2)]
    max_matches_per_ray: usize,

    #[arg(long, default_value_t = 999.9)]
    maxdistance: f64,

    /// Connectivity stencil: 0, 6, 18, or 26.
    #[arg(long, default_value_t = 6)]
    neighbours: u32,
}

fn parse_neighbourhood(n: u32) -> Result<Neighbourhood> {
    Ok(match n {
        0 => Neighbourhood::Zero,
        6 => Neighbourhood::Six,
        18 => Neighbourhood::Eighteen,
        26 => Neighbourhood::TwentySix,
        other => {
            bail!("unrecognized neighbourhood connectivity: {other} (expected 0, 6, 18, or 26)")
        }
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.bounding_box.len() != 6 {
        bail!("--bounding-box expects exactly 6 values: xmin xmax ymin ymax zmin zmax");
    }
    let b = &cli.bounding_box;
    let cfg = PipelineConfig {
        bounding_box: [[b[0], b[1]], [b[2], b[3]], [b[4], b[5]]],
        nx: cli.nx,
        ny: cli.ny,
        nz: cli.nz,
        cam_match: cli.cam_match,
        max_matches_per_ray: cli.max_matches_per_ray,
        maxdistance: cli.maxdistance,
        neighbours: parse_neighbourhood(cli.neighbours)?,
    };

    let rays = io::read_rays(&cli.input).context("loading ray input")?;
    let output = run_pipeline(&rays, &cfg).context("running space-traversal matching")?;

    log::info!(
        "pipeline complete: {} rays in, {} valid, {} missed, {} candidates, {} approved",
        output.counters.rays_in,
        output.counters.rays_valid,
        output.counters.rays_missed,
        output.counters.candidates,
        output.counters.approved,
    );

    io::write_matches(&cli.output, &output.matches).context("writing match output")?;
    Ok(())
}
