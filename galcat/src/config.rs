//! Named simulation configurations.
//!
//! A simulation is described by a small JSON file in a config directory:
//! box size, catalogue location, snapshot file prefix and the cosmology
//! the snapshots were run with. Components receive the resolved config
//! explicitly; nothing reads paths from process-wide state.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cosmology::FlatLambdaCdm;

/// Errors loading a simulation configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no simulation config at {0}")]
    NotFound(PathBuf),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Named cosmology selector stored in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CosmologyName {
    Planck15,
}

impl CosmologyName {
    /// Resolve the selector to concrete cosmological parameters.
    pub fn resolve(&self) -> FlatLambdaCdm {
        match self {
            CosmologyName::Planck15 => FlatLambdaCdm::planck15(),
        }
    }
}

/// Resolved configuration for one simulation volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulation name, e.g. "m25n256"
    pub name: String,
    /// Comoving box side length in Mpc/h
    pub box_size_mpc_h: f64,
    /// Directory holding the per-snapshot catalogue files
    pub catalogue_dir: PathBuf,
    /// Filename prefix of catalogue files, e.g. "m25n256"
    pub snapshot_prefix: String,
    /// Cosmology the snapshots were run with
    pub cosmology: CosmologyName,
}

impl SimulationConfig {
    /// Load the config named `name` from `<config_dir>/<name>.json`.
    pub fn load(config_dir: &Path, name: &str) -> Result<Self, ConfigError> {
        let path = config_dir.join(format!("{name}.json"));
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let file = File::open(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse { path, source })
    }

    /// Path of the catalogue file for one snapshot (zero-padded number).
    pub fn catalogue_path(&self, snap: u32) -> PathBuf {
        self.catalogue_dir
            .join(format!("{}_{:03}.json", self.snapshot_prefix, snap))
    }

    /// The resolved cosmological parameters for this simulation.
    pub fn cosmology(&self) -> FlatLambdaCdm {
        self.cosmology.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = SimulationConfig {
            name: "m25n256".to_string(),
            box_size_mpc_h: 25.0,
            catalogue_dir: dir.path().join("Groups"),
            snapshot_prefix: "m25n256".to_string(),
            cosmology: CosmologyName::Planck15,
        };
        let path = dir.path().join("m25n256.json");
        serde_json::to_writer(File::create(&path).unwrap(), &config).unwrap();

        let loaded = SimulationConfig::load(dir.path(), "m25n256").unwrap();
        assert_eq!(loaded.name, "m25n256");
        assert_eq!(loaded.box_size_mpc_h, 25.0);
        assert_eq!(loaded.cosmology, CosmologyName::Planck15);
    }

    #[test]
    fn test_catalogue_path_zero_padded() {
        let config = SimulationConfig {
            name: "m25n256".to_string(),
            box_size_mpc_h: 25.0,
            catalogue_dir: PathBuf::from("/data/Groups"),
            snapshot_prefix: "m25n256".to_string(),
            cosmology: CosmologyName::Planck15,
        };
        assert_eq!(
            config.catalogue_path(42),
            PathBuf::from("/data/Groups/m25n256_042.json")
        );
        assert_eq!(
            config.catalogue_path(151),
            PathBuf::from("/data/Groups/m25n256_151.json")
        );
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = SimulationConfig::load(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_cosmology_resolution() {
        let cosmo = CosmologyName::Planck15.resolve();
        assert!((cosmo.hubble_constant() - 67.74).abs() < 1e-9);
    }
}
