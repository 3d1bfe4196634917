//! Galaxy catalogue access for cosmological simulation snapshots
//!
//! This crate provides the catalogue layer of the background-light
//! pipeline: a `SnapshotCatalogue` trait over per-snapshot galaxy
//! properties, a JSON-backed on-disk reader, a synthetic in-memory
//! catalogue for tests and demos, and named simulation configurations.

pub mod catalogue;
pub mod classify;
pub mod config;
pub mod json_snapshot;
pub mod snapshots;
pub mod synthetic;

pub use catalogue::{properties, CatalogueError, SnapshotCatalogue};
pub use classify::{classify_galaxies, stellar_mass_bins, Classification};
pub use config::{ConfigError, CosmologyName, SimulationConfig};
pub use json_snapshot::JsonSnapshot;
pub use snapshots::{available_snapshots, SnapshotRecord};
pub use synthetic::SyntheticCatalogue;
