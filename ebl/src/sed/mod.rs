//! Spectral energy distribution models and grid utilities

pub mod grid;
pub mod mbb;
pub mod sps;

pub use grid::{interp_onto, log_grid, to_observer_frame, to_rest_frame};
pub use mbb::{modified_blackbody, normalised_mbb};
pub use sps::{BlackbodyPopulation, SpsError, SpsModel, SpsSpectrum};
