//! Far-infrared cosmic background tool
//!
//! Builds (or loads) a lightcone for the configured simulation, sums the
//! redshifted modified-blackbody emission of every galaxy on the cone and
//! writes the observer-frame background spectrum to a JSON file for
//! downstream plotting.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin farir_background -- --sim m25n256 --area 1.0 --z-min 0.0 --z-max 3.0
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use ebl::{FarInfraredBackground, FileCatalogueProvider, LightconeBuilder};
use galcat::SimulationConfig;

#[derive(Parser, Debug)]
#[command(
    name = "farir_background",
    about = "Far-IR background intensity from lightcone galaxies",
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

    /// Dust emissivity index
    #[arg(long, default_value_t = 2.0)]
    beta: f64,

    /// Number of observer-frame wavelength grid points
    #[arg(long, default_value_t = 300)]
    n_points: usize,

    /// Random seed for a fresh lightcone (fresh realization if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Output spectrum file
    #[arg(long, default_value = "farir_background.json")]
    out: PathBuf,
}

/// Serialized output spectrum
#[derive(Serialize)]
struct SpectrumOutput {
    simulation: String,
    area_deg2: f64,
    z_min: f64,
    z_max: f64,
    /// Observer-frame wavelength, angstrom
    wavelength_aa: Vec<f64>,
    /// Surface brightness, erg s⁻¹ cm⁻² Å⁻¹ sr⁻¹
    intensity: Vec<f64>,
    /// λ·I_λ, erg s⁻¹ cm⁻² sr⁻¹
    lambda_i_lambda: Vec<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = SimulationConfig::load(&args.config_dir, &args.sim)
        .with_context(|| format!("loading simulation config '{}'", args.sim))?;
    println!(
        "Running on {} (box={} Mpc/h)",
        config.name, config.box_size_mpc_h
    );

    let mut builder = LightconeBuilder::new(&config, &args.output_dir);
    if let Some(seed) = args.seed {
        builder = builder.with_seed(seed);
    }
    let table = builder
        .build(args.area, args.z_min, args.z_max)
        .context("lightcone build failed")?;

    let spinner = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or(ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!(
        "summing {} galaxies across {} snapshots",
        table.n_galaxies(),
        table.unique_snapshots().len()
    ));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let aggregator = FarInfraredBackground::new(config.cosmology())
        .with_beta(args.beta)
        .with_grid(3e5, 1e7, args.n_points);
    let provider = FileCatalogueProvider::new(&config);
    let (spectrum, skips) = aggregator
        .aggregate(&table, &provider)
        .context("far-IR aggregation failed")?;
    spinner.finish_and_clear();

    if skips.total() > 0 {
        println!("Skipped {} galaxies/snapshots (see log)", skips.total());
    }

    let output = SpectrumOutput {
        simulation: config.name.clone(),
        area_deg2: args.area,
        z_min: args.z_min,
        z_max: args.z_max,
        lambda_i_lambda: spectrum
            .wavelength_aa
            .iter()
            .zip(spectrum.intensity.iter())
            .map(|(w, i)| w * i)
            .collect(),
        wavelength_aa: spectrum.wavelength_aa.to_vec(),
        intensity: spectrum.intensity.to_vec(),
    };

    let file = File::create(&args.out)
        .with_context(|| format!("creating output file {}", args.out.display()))?;
    serde_json::to_writer(BufWriter::new(file), &output)?;
    println!("Saved → {}", args.out.display());

    Ok(())
}
