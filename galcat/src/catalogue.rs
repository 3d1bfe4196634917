//! The snapshot catalogue trait and its error type.
//!
//! A snapshot catalogue exposes global snapshot metadata (redshift, box
//! size) and per-galaxy scalar arrays addressed by property name. The
//! pipeline only ever consumes catalogues through this trait, so on-disk
//! formats and in-memory test catalogues are interchangeable.

use std::path::PathBuf;

use ndarray::{Array2, ArrayView1};
use thiserror::Error;

/// Well-known per-galaxy property names.
///
/// The dotted names follow the grouping convention of the upstream
/// catalogue files (mass dictionary, metallicity dictionary, flat scalars).
pub mod properties {
    /// Stellar mass in solar masses
    pub const STELLAR_MASS: &str = "masses.stellar";
    /// Dust mass in solar masses
    pub const DUST_MASS: &str = "masses.dust";
    /// Gas mass in solar masses
    pub const GAS_MASS: &str = "masses.gas";
    /// Mass-weighted gas-phase metal mass fraction
    pub const METALLICITY_MASS_WEIGHTED: &str = "metallicities.mass_weighted";
    /// Stellar metal mass fraction
    pub const METALLICITY_STELLAR: &str = "metallicities.stellar";
    /// Far-infrared luminosity in erg/s
    pub const L_FIR: &str = "L_FIR";
    /// Instantaneous star-formation rate in solar masses per year
    pub const SFR: &str = "sfr";
}

/// Errors that can occur when reading snapshot catalogues
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("missing catalogue file: {0}")]
    MissingCatalogue(PathBuf),

    #[error("missing galaxy property '{0}'")]
    MissingProperty(String),

    #[error("property '{name}' has {got} entries, expected {expected}")]
    ShapeMismatch {
        name: String,
        got: usize,
        expected: usize,
    },

    #[error("failed to read catalogue {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalogue {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Per-snapshot galaxy property access.
///
/// Implementations must return positions in comoving Mpc and box sizes in
/// comoving Mpc; property arrays are indexed by galaxy and must all share
/// the catalogue length.
pub trait SnapshotCatalogue {
    /// Redshift of the snapshot
    fn redshift(&self) -> f64;

    /// Comoving box side length in Mpc
    fn box_size_mpc(&self) -> f64;

    /// Galaxy positions as an n × 3 array of comoving Mpc coordinates
    fn galaxy_positions(&self) -> &Array2<f64>;

    /// A named per-galaxy scalar array
    fn galaxy_property(&self, name: &str) -> Result<ArrayView1<'_, f64>, CatalogueError>;

    /// Names of all properties carried by this catalogue
    fn property_names(&self) -> Vec<String>;

    /// Number of galaxies in the catalogue
    fn len(&self) -> usize;

    /// Check if the catalogue is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
