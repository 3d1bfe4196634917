//! The persisted lightcone catalogue.
//!
//! One row per selected galaxy: angular offsets from the field center,
//! assigned redshift, and the (snapshot, galaxy index) pair that resolves
//! the galaxy back to its source catalogue. Tables are immutable once
//! written; the on-disk file doubles as a build cache keyed by
//! (simulation, area, redshift window).

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::LightconeError;

/// One galaxy on the lightcone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightconeEntry {
    /// Angular offset from field center, degrees
    pub ra_deg: f64,
    /// Angular offset from field center, degrees
    pub dec_deg: f64,
    /// Assigned redshift
    pub redshift: f64,
    /// Source snapshot number
    pub snap: u32,
    /// Galaxy index within the source snapshot catalogue
    pub galaxy_index: usize,
    /// Stellar mass in solar masses
    pub stellar_mass: f64,
}

/// A complete lightcone realization with its build parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightconeTable {
    /// Simulation name the cone was drawn from
    pub simulation: String,
    /// Field area in square degrees
    pub area_deg2: f64,
    /// Lower redshift bound (inclusive)
    pub z_min: f64,
    /// Upper redshift bound (inclusive)
    pub z_max: f64,
    /// Selected galaxies, ordered by source snapshot
    pub entries: Vec<LightconeEntry>,
}

impl LightconeTable {
    /// Number of galaxies on the cone.
    pub fn n_galaxies(&self) -> usize {
        self.entries.len()
    }

    /// Cache file name for a build key. Re-running a build with the same
    /// key resolves to the same file and short-circuits reconstruction.
    pub fn cache_file_name(simulation: &str, area_deg2: f64, z_min: f64, z_max: f64) -> String {
        format!("lc_{simulation}_a{area_deg2}_z{z_min}-{z_max}.json")
    }

    /// Sorted, deduplicated list of snapshots contributing entries.
    pub fn unique_snapshots(&self) -> Vec<u32> {
        let mut snaps: Vec<u32> = self.entries.iter().map(|e| e.snap).collect();
        snaps.sort_unstable();
        snaps.dedup();
        snaps
    }

    /// Load a persisted table.
    pub fn load(path: &Path) -> Result<Self, LightconeError> {
        let file = File::open(path).map_err(|source| LightconeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LightconeError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Persist the table.
    pub fn save(&self, path: &Path) -> Result<(), LightconeError> {
        let file = File::create(path).map_err(|source| LightconeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer(BufWriter::new(file), self).map_err(|source| {
            LightconeError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}
