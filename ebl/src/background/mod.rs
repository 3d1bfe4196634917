//! Background aggregation
//!
//! Sums per-galaxy observer-frame flux contributions from a lightcone onto
//! a shared wavelength grid and converts the total to surface brightness.
//! Structural failures (unresolvable catalogues for every snapshot,
//! invalid configuration) surface as errors; per-galaxy numerical problems
//! are skipped and tallied, never propagated.

mod far_ir;
mod optical;

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::Array1;
use thiserror::Error;
use tracing::info;

use galcat::{CatalogueError, JsonSnapshot, SimulationConfig, SnapshotCatalogue};

pub use far_ir::FarInfraredBackground;
pub use optical::OpticalBackground;

/// Errors from background aggregation.
///
/// Per-galaxy numerical problems never appear here; they are absorbed into
/// `SkipCounts`.
#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error("field area must be positive, got {0} deg²")]
    InvalidArea(f64),
}

/// The aggregated output: observer-frame wavelength against summed
/// intensity. The grid is fixed for the duration of one aggregation and
/// every intensity value is finite.
#[derive(Debug, Clone)]
pub struct BackgroundSpectrum {
    /// Observer-frame wavelength in angstrom
    pub wavelength_aa: Array1<f64>,
    /// Surface brightness on the grid (per-Å or per-Hz depending on branch)
    pub intensity: Array1<f64>,
}

/// Tallies of per-galaxy and per-snapshot skips during one aggregation.
///
/// Skips are expected in noisy simulation data; they are reported, not
/// raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// Snapshots whose catalogue file could not be resolved
    pub missing_catalogue: usize,
    /// Snapshots lacking a required property array
    pub missing_property: usize,
    /// Entries whose galaxy index exceeds the current catalogue length
    pub stale_index: usize,
    /// Galaxies with non-finite or non-positive physical quantities
    pub invalid_state: usize,
    /// Galaxies whose SED could not be normalized or generated
    pub normalisation_failure: usize,
    /// Galaxies whose computed flux contained non-finite values
    pub non_finite_contribution: usize,
}

impl SkipCounts {
    /// Total skipped units (snapshots plus galaxies).
    pub fn total(&self) -> usize {
        self.missing_catalogue
            + self.missing_property
            + self.stale_index
            + self.invalid_state
            + self.normalisation_failure
            + self.non_finite_contribution
    }

    /// Emit the post-aggregation summary.
    pub fn log_summary(&self) {
        if self.total() == 0 {
            return;
        }
        info!(
            missing_catalogue = self.missing_catalogue,
            missing_property = self.missing_property,
            stale_index = self.stale_index,
            invalid_state = self.invalid_state,
            normalisation_failure = self.normalisation_failure,
            non_finite_contribution = self.non_finite_contribution,
            "aggregation skips"
        );
    }
}

/// Resolves a snapshot number to a loaded catalogue.
///
/// Aggregators pull catalogues through this seam so they stay decoupled
/// from the on-disk layout; tests supply in-memory catalogues.
pub trait CatalogueProvider {
    fn catalogue(&self, snap: u32) -> Result<Arc<dyn SnapshotCatalogue>, CatalogueError>;
}

/// File-backed provider reading JSON snapshot catalogues for a simulation.
pub struct FileCatalogueProvider<'a> {
    config: &'a SimulationConfig,
}

impl<'a> FileCatalogueProvider<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }
}

impl CatalogueProvider for FileCatalogueProvider<'_> {
    fn catalogue(&self, snap: u32) -> Result<Arc<dyn SnapshotCatalogue>, CatalogueError> {
        let path = self.config.catalogue_path(snap);
        Ok(Arc::new(JsonSnapshot::load(&path)?))
    }
}

/// In-memory provider mapping snapshot numbers to prepared catalogues.
#[derive(Default)]
pub struct MemoryCatalogueProvider {
    catalogues: BTreeMap<u32, Arc<dyn SnapshotCatalogue>>,
}

impl MemoryCatalogueProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalogue for a snapshot number.
    pub fn insert(&mut self, snap: u32, catalogue: Arc<dyn SnapshotCatalogue>) {
        self.catalogues.insert(snap, catalogue);
    }
}

impl CatalogueProvider for MemoryCatalogueProvider {
    fn catalogue(&self, snap: u32) -> Result<Arc<dyn SnapshotCatalogue>, CatalogueError> {
        self.catalogues
            .get(&snap)
            .cloned()
            .ok_or_else(|| CatalogueError::MissingCatalogue(format!("snapshot {snap}").into()))
    }
}

/// Solid angle of a square field in steradians: area · (π/180)².
pub fn solid_angle_sr(area_deg2: f64) -> f64 {
    let deg = std::f64::consts::PI / 180.0;
    area_deg2 * deg * deg
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solid_angle() {
        // 1 deg² = (π/180)² sr ≈ 3.046e-4 sr
        assert_relative_eq!(solid_angle_sr(1.0), 3.0462e-4, max_relative = 1e-4);
        assert_relative_eq!(solid_angle_sr(2.0), 2.0 * solid_angle_sr(1.0));
    }

    #[test]
    fn test_memory_provider_missing() {
        let provider = MemoryCatalogueProvider::new();
        assert!(provider.catalogue(42).is_err());
    }

    #[test]
    fn test_skip_counts_total() {
        let counts = SkipCounts {
            missing_catalogue: 1,
            stale_index: 2,
            invalid_state: 3,
            ..Default::default()
        };
        assert_eq!(counts.total(), 6);
        assert_eq!(SkipCounts::default().total(), 0);
    }
}
