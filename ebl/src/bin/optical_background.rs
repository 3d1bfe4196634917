//! Optical/near-IR cosmic background tool
//!
//! Builds (or loads) a lightcone, generates a stellar population spectrum
//! for every galaxy on the cone, redshifts and sums the spectra and writes
//! the observer-frame background to a JSON file. Uses the built-in
//! blackbody population model; swap in an external synthesis library via
//! the `SpsModel` trait for production spectra.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin optical_background -- --sim m25n256 --area 1.0 --z-min 0.0 --z-max 3.0
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use cosmology::SI;
use ebl::{BlackbodyPopulation, FileCatalogueProvider, LightconeBuilder, OpticalBackground};
use galcat::SimulationConfig;

#[derive(Parser, Debug)]
#[command(
    name = "optical_background",
    about = "Optical/near-IR background intensity from lightcone galaxies",
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

    /// Number of observer-frame wavelength grid points
    #[arg(long, default_value_t = 500)]
    n_points: usize,

    /// Snapshots to exclude from aggregation
    #[arg(long, value_delimiter = ',')]
    skip_snaps: Vec<u32>,

    /// Random seed for a fresh lightcone (fresh realization if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Output spectrum file
    #[arg(long, default_value = "optical_background.json")]
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
    /// Surface brightness, erg s⁻¹ cm⁻² Hz⁻¹ sr⁻¹
    intensity: Vec<f64>,
    /// ν·I_ν, erg s⁻¹ cm⁻² sr⁻¹
    nu_i_nu: Vec<f64>,
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

    let aggregator = OpticalBackground::new(config.cosmology(), BlackbodyPopulation::new())
        .with_grid(1e3, 5e4, args.n_points)
        .with_skip_snaps(args.skip_snaps.iter().copied());
    let provider = FileCatalogueProvider::new(&config);
    let (spectrum, skips) = aggregator
        .aggregate(&table, &provider)
        .context("optical aggregation failed")?;
    spinner.finish_and_clear();

    if skips.total() > 0 {
        println!("Skipped {} galaxies/snapshots (see log)", skips.total());
    }

    let output = SpectrumOutput {
        simulation: config.name.clone(),
        area_deg2: args.area,
        z_min: args.z_min,
        z_max: args.z_max,
        nu_i_nu: spectrum
            .wavelength_aa
            .iter()
            .zip(spectrum.intensity.iter())
            .map(|(w, i)| SI::SPEED_OF_LIGHT / (w * SI::ANGSTROM_IN_M) * i)
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
