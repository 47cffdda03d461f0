//! Command-line front end: loads a terrain config and generates it into a
//! summarising mesh sink.
#![forbid(unsafe_code)]

mod summary;

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use strata_runtime::TerrainGenerator;
use strata_world::{TerrainConfig, load_config_from_path};

use crate::summary::SummarySink;

#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Chunked voxel terrain generator")]
struct Args {
    /// Terrain config (TOML). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override `world.seed`.
    #[arg(long)]
    seed: Option<i32>,

    /// Override `world.chunks`.
    #[arg(long)]
    chunks: Option<u32>,

    /// Build chunks on the rayon pool.
    #[arg(long)]
    parallel: bool,

    /// Only clear the mesh sections; skip generation.
    #[arg(long)]
    clear: bool,

    /// Clamp out-of-range values instead of rejecting them.
    #[arg(long)]
    clamp: bool,

    /// Write a TOML summary of the emitted sections here.
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<TerrainConfig, Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => {
            let cfg = load_config_from_path(path)?;
            log::info!("loaded terrain config from {}", path.display());
            cfg
        }
        None => TerrainConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.world.seed = seed;
    }
    if let Some(chunks) = args.chunks {
        cfg.world.chunks = chunks;
    }
    if args.clamp {
        cfg = cfg.clamped();
    }
    Ok(cfg)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let cfg = load_config(&args)?;
    let mut generator = TerrainGenerator::new(cfg);
    generator.set_parallel(args.parallel);
    if args.clear {
        generator.request_clear();
    } else {
        generator.request_generate();
    }

    let mut sink = SummarySink::default();
    let Some(report) = generator.apply(&mut sink)? else {
        log::info!("no terrain generated");
        return Ok(());
    };

    if let Some(bb) = sink.bounds() {
        log::info!(
            "terrain bounds: min={:?} max={:?} extent={:?}",
            bb.min,
            bb.max,
            bb.extent()
        );
    }
    for s in sink.sections() {
        log::info!(
            "section {:>3} [{}]: {} verts, {} tris",
            s.index,
            s.material,
            s.vertices,
            s.triangles
        );
    }

    if let Some(path) = &args.summary {
        let summary = sink.into_summary(&report);
        fs::write(path, toml::to_string_pretty(&summary)?)?;
        log::info!("wrote summary to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
