//! Lightcone construction
//!
//! Projects a redshift-ordered set of simulation snapshots into a single
//! pencil-beam catalogue of galaxies with sky positions and redshifts.

mod builder;
mod table;

use std::path::PathBuf;

use thiserror::Error;

use cosmology::CosmologyError;
use galcat::CatalogueError;

pub use builder::LightconeBuilder;
pub use table::{LightconeEntry, LightconeTable};

/// Errors from building or loading a lightcone
#[derive(Debug, Error)]
pub enum LightconeError {
    /// Fatal: the snapshot scan (with the ±0.5 redshift buffer applied)
    /// produced nothing to project. No partial table is written.
    #[error("no snapshots with redshift in [{z_min} - 0.5, {z_max} + 0.5]")]
    NoSnapshotsInRange { z_min: f64, z_max: f64 },

    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error(transparent)]
    Cosmology(#[from] CosmologyError),

    #[error("failed to read lightcone table {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse lightcone table {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
