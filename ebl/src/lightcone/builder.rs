//! The lightcone builder.
//!
//! For every snapshot in the requested redshift window (with a ±0.5 buffer
//! against edge loss), a random sub-volume sized to the requested sky area
//! is cut out of the box; galaxies inside it get angular offsets by linear
//! rescale and a redshift by inverting the comoving-distance relation at
//! their recentered line-of-sight coordinate. The unified catalogue is
//! persisted and reused as a cache: re-running the same build key returns
//! the stored realization instead of drawing a fresh sub-volume.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, RngCore, SeedableRng};
use tracing::{debug, info, warn};

use cosmology::{DistanceInverter, FlatLambdaCdm};
use galcat::{available_snapshots, properties, JsonSnapshot, SimulationConfig, SnapshotCatalogue};

use super::{LightconeEntry, LightconeError, LightconeTable};

/// Redshift buffer around the requested window when retaining snapshots.
/// The random sub-volume projection can move galaxies past a snapshot's
/// nominal redshift, so the snapshot cut is looser than the final cut.
const SNAPSHOT_Z_BUFFER: f64 = 0.5;

/// Extra redshift headroom for the tabulated distance inversion beyond the
/// deepest retained snapshot.
const INVERTER_Z_HEADROOM: f64 = 1.0;

/// Builds lightcone catalogues for one simulation.
pub struct LightconeBuilder<'a> {
    config: &'a SimulationConfig,
    cosmology: FlatLambdaCdm,
    output_dir: PathBuf,
    seed: Option<u64>,
}

impl<'a> LightconeBuilder<'a> {
    /// Create a builder writing cached tables into `output_dir`.
    pub fn new(config: &'a SimulationConfig, output_dir: &Path) -> Self {
        Self {
            config,
            cosmology: config.cosmology(),
            output_dir: output_dir.to_path_buf(),
            seed: None,
        }
    }

    /// Fix the random seed for the sub-volume draws. Without this, each
    /// fresh build is an independent realization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build (or load from cache) the lightcone for one key.
    ///
    /// Idempotent per (simulation, area, z_min, z_max): if a cached table
    /// exists it is returned unmodified and no randomness is consumed.
    pub fn build(
        &self,
        area_deg2: f64,
        z_min: f64,
        z_max: f64,
    ) -> Result<LightconeTable, LightconeError> {
        let cache_path = self.output_dir.join(LightconeTable::cache_file_name(
            &self.config.name,
            area_deg2,
            z_min,
            z_max,
        ));
        if cache_path.exists() {
            info!(path = %cache_path.display(), "lightcone cached");
            return LightconeTable::load(&cache_path);
        }

        let mut snaps = available_snapshots(self.config)?;
        snaps.sort_by(|a, b| a.redshift.total_cmp(&b.redshift));
        snaps.retain(|r| {
            r.redshift >= z_min - SNAPSHOT_Z_BUFFER && r.redshift <= z_max + SNAPSHOT_Z_BUFFER
        });

        if snaps.is_empty() {
            return Err(LightconeError::NoSnapshotsInRange { z_min, z_max });
        }
        info!(
            n_snapshots = snaps.len(),
            z_low = snaps[0].redshift,
            z_high = snaps[snaps.len() - 1].redshift,
            "building lightcone"
        );

        let inverter = DistanceInverter::new(
            &self.cosmology,
            z_max + SNAPSHOT_Z_BUFFER + INVERTER_Z_HEADROOM,
            cosmology::inverse::DEFAULT_SAMPLES,
        )?;

        let seed = self.seed.unwrap_or(thread_rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);
        debug!(seed, "sub-volume RNG seeded");

        let sqrt_area = area_deg2.sqrt();
        let mut entries = Vec::new();

        for record in &snaps {
            let catalogue = match JsonSnapshot::load(&record.path) {
                Ok(c) => c,
                Err(err) => {
                    warn!(snap = record.snap, %err, "skipping snapshot");
                    continue;
                }
            };
            if catalogue.is_empty() {
                continue;
            }
            let stellar_mass = match catalogue.galaxy_property(properties::STELLAR_MASS) {
                Ok(m) => m,
                Err(err) => {
                    warn!(snap = record.snap, %err, "skipping snapshot");
                    continue;
                }
            };

            // Comoving side length subtending sqrt(area) degrees at this
            // snapshot's redshift; clamped to the box for very low z.
            let (scale, d_center) = match (
                self.cosmology.mpc_per_degree(record.redshift),
                self.cosmology.comoving_distance_mpc(record.redshift),
            ) {
                (Ok(s), Ok(d)) => (s, d),
                _ => {
                    warn!(
                        snap = record.snap,
                        redshift = record.redshift,
                        "skipping snapshot (invalid redshift)"
                    );
                    continue;
                }
            };
            let a = scale * sqrt_area;
            let l = record.box_size_mpc;
            let span = (l - a).max(0.0);
            let a = a.min(l);

            let xmin = rng.gen::<f64>() * span;
            let ymin = rng.gen::<f64>() * span;
            let positions = catalogue.galaxy_positions();

            let mut selected = 0usize;
            let mut dropped_inversion = 0usize;
            for i in 0..catalogue.len() {
                let x = positions[[i, 0]];
                let y = positions[[i, 1]];
                if x < xmin || x >= xmin + a || y < ymin || y >= ymin + a {
                    continue;
                }
                selected += 1;

                let ra_deg = (x - xmin - a / 2.0) / a * sqrt_area;
                let dec_deg = (y - ymin - a / 2.0) / a * sqrt_area;

                // Recenter so the box middle sits at the snapshot's
                // comoving distance, then invert distance to redshift.
                let d = d_center + (positions[[i, 2]] - l / 2.0);
                let redshift = match inverter.redshift_at_comoving_distance_mpc(d) {
                    Ok(z) => z,
                    Err(_) => {
                        dropped_inversion += 1;
                        continue;
                    }
                };
                if redshift < z_min || redshift > z_max {
                    continue;
                }

                entries.push(LightconeEntry {
                    ra_deg,
                    dec_deg,
                    redshift,
                    snap: record.snap,
                    galaxy_index: i,
                    stellar_mass: stellar_mass[i],
                });
            }
            debug!(
                snap = record.snap,
                z_snap = record.redshift,
                selected,
                dropped_inversion,
                "snapshot projected"
            );
        }

        let table = LightconeTable {
            simulation: self.config.name.clone(),
            area_deg2,
            z_min,
            z_max,
            entries,
        };

        std::fs::create_dir_all(&self.output_dir).map_err(|source| LightconeError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        table.save(&cache_path)?;
        info!(
            n_galaxies = table.n_galaxies(),
            path = %cache_path.display(),
            "lightcone saved"
        );

        Ok(table)
    }
}
