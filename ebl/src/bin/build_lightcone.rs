//! Lightcone generation tool
//!
//! Draws a pencil-beam lightcone through the snapshots of a configured
//! simulation and writes the galaxy table to the lightcone cache
//! directory. Re-running with the same simulation, area and redshift
//! window returns the cached realization.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin build_lightcone -- --sim m25n256 --area 1.0 --z-min 0.0 --z-max 3.0
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ebl::LightconeBuilder;
use galcat::SimulationConfig;

#[derive(Parser, Debug)]
#[command(
    name = "build_lightcone",
    about = "Generate a pencil-beam lightcone catalogue from simulation snapshots",
    long_about = None
)]
struct Args {
    /// Simulation name (resolved from the config directory)
    #[arg(long, default_value = "m25n256")]
    sim: String,

    /// Directory holding simulation config files
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Directory for cached lightcone tables
    #[arg(long, default_value = "data/lightcones")]
    output_dir: PathBuf,

    /// Field area in square degrees
    #[arg(long, default_value_t = 1.0)]
    area: f64,

    /// Lower redshift bound
    #[arg(long, default_value_t = 0.0)]
    z_min: f64,

    /// Upper redshift bound
    #[arg(long, default_value_t = 3.0)]
    z_max: f64,

    /// Random seed for the sub-volume draws (fresh realization if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = SimulationConfig::load(&args.config_dir, &args.sim)
        .with_context(|| format!("loading simulation config '{}'", args.sim))?;
    println!(
        "Generating lightcone for {} (box={} Mpc/h)",
        config.name, config.box_size_mpc_h
    );

    let mut builder = LightconeBuilder::new(&config, &args.output_dir);
    if let Some(seed) = args.seed {
        builder = builder.with_seed(seed);
    }

    let table = builder
        .build(args.area, args.z_min, args.z_max)
        .context("lightcone build failed")?;

    println!(
        "Lightcone complete: {} galaxies across {} snapshots",
        table.n_galaxies(),
        table.unique_snapshots().len()
    );

    Ok(())
}
