//! Extragalactic background light from simulated galaxy populations
//!
//! This crate turns discrete cosmological simulation snapshots into
//! observer-frame background intensity spectra. A pencil-beam lightcone is
//! drawn through the snapshot set, assigning every selected galaxy a sky
//! position and a redshift; per-galaxy spectral energy distributions are
//! then redshifted, distance-attenuated and summed onto a shared
//! wavelength grid to give the far-infrared or optical/near-infrared
//! background surface brightness.

pub mod background;
pub mod lightcone;
pub mod physics;
pub mod sed;

// Re-exports for easier access
pub use background::{
    BackgroundError, BackgroundSpectrum, CatalogueProvider, FarInfraredBackground,
    FileCatalogueProvider, MemoryCatalogueProvider, OpticalBackground, SkipCounts,
};
pub use lightcone::{LightconeBuilder, LightconeEntry, LightconeError, LightconeTable};
pub use physics::dust::equivalent_dust_temperature;
pub use sed::mbb::{modified_blackbody, normalised_mbb};
pub use sed::sps::{BlackbodyPopulation, SpsError, SpsModel, SpsSpectrum};
