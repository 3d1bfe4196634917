//! Far-infrared background aggregation.
//!
//! Every lightcone galaxy with a valid far-IR luminosity and equivalent
//! dust temperature contributes a redshifted modified blackbody,
//! attenuated by luminosity distance; the sum over the cone divided by the
//! field solid angle is the far-IR background surface brightness in
//! erg s⁻¹ cm⁻² Å⁻¹ sr⁻¹.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use ndarray::Array1;

use cosmology::FlatLambdaCdm;
use galcat::properties;

use crate::lightcone::LightconeTable;
use crate::sed::grid::{log_grid, to_rest_frame};
use crate::sed::mbb::normalised_mbb;
use crate::physics::dust::equivalent_dust_temperature;

use super::{
    solid_angle_sr, BackgroundError, BackgroundSpectrum, CatalogueProvider, SkipCounts,
};

/// Default emissivity index
const DEFAULT_BETA: f64 = 2.0;
/// Default observer-frame grid: 30 µm – 1 mm
const DEFAULT_GRID_LO_AA: f64 = 3e5;
const DEFAULT_GRID_HI_AA: f64 = 1e7;
const DEFAULT_GRID_POINTS: usize = 300;

/// Per-snapshot derived state, built once per aggregation.
struct SnapshotState {
    l_fir: Array1<f64>,
    t_eqv: Array1<f64>,
    valid: Vec<bool>,
}

/// Far-infrared background aggregator.
pub struct FarInfraredBackground {
    cosmology: FlatLambdaCdm,
    beta: f64,
    grid: Array1<f64>,
}

impl FarInfraredBackground {
    /// Create an aggregator with the default emissivity index and grid.
    pub fn new(cosmology: FlatLambdaCdm) -> Self {
        Self {
            cosmology,
            beta: DEFAULT_BETA,
            grid: log_grid(DEFAULT_GRID_LO_AA, DEFAULT_GRID_HI_AA, DEFAULT_GRID_POINTS),
        }
    }

    /// Override the emissivity index.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Override the observer-frame wavelength grid (angstrom).
    pub fn with_grid(mut self, lo_aa: f64, hi_aa: f64, n: usize) -> Self {
        self.grid = log_grid(lo_aa, hi_aa, n);
        self
    }

    /// The observer-frame wavelength grid in angstrom.
    pub fn grid(&self) -> &Array1<f64> {
        &self.grid
    }

    /// Sum redshifted modified-blackbody contributions over the lightcone.
    ///
    /// Per-snapshot dust state is derived lazily on first encounter and
    /// cached for the duration of this call. Per-galaxy numerical problems
    /// are tallied in the returned `SkipCounts`; only structural failures
    /// abort.
    pub fn aggregate(
        &self,
        table: &LightconeTable,
        provider: &dyn CatalogueProvider,
    ) -> Result<(BackgroundSpectrum, SkipCounts), BackgroundError> {
        if !(table.area_deg2 > 0.0) {
            return Err(BackgroundError::InvalidArea(table.area_deg2));
        }

        let mut total: Array1<f64> = Array1::zeros(self.grid.len());
        let mut skips = SkipCounts::default();
        let mut cache: BTreeMap<u32, Option<SnapshotState>> = BTreeMap::new();

        for entry in &table.entries {
            if !cache.contains_key(&entry.snap) {
                let state = self.load_snapshot_state(provider, entry.snap, &mut skips);
                cache.insert(entry.snap, state);
            }
            let Some(Some(state)) = cache.get(&entry.snap) else {
                continue;
            };

            let gi = entry.galaxy_index;
            if gi >= state.l_fir.len() {
                skips.stale_index += 1;
                continue;
            }
            if !state.valid[gi] {
                skips.invalid_state += 1;
                continue;
            }
            let (l_fir, t_eqv) = (state.l_fir[gi], state.t_eqv[gi]);
            if !(l_fir.is_finite() && t_eqv.is_finite() && l_fir > 0.0 && t_eqv > 0.0) {
                skips.invalid_state += 1;
                continue;
            }

            let z = entry.redshift;
            let lam_rest = to_rest_frame(&self.grid, z);
            let Some(sed) = normalised_mbb(&lam_rest, l_fir, t_eqv, self.beta) else {
                skips.normalisation_failure += 1;
                continue;
            };

            let d_l_cm = match self.cosmology.luminosity_distance_cm(z) {
                Ok(d) => d,
                Err(_) => {
                    skips.invalid_state += 1;
                    continue;
                }
            };

            let flux = sed * (1.0 / (4.0 * PI * d_l_cm * d_l_cm * (1.0 + z)));
            if flux.iter().all(|v| v.is_finite()) {
                total += &flux;
            } else {
                skips.non_finite_contribution += 1;
            }
        }

        let intensity = total / solid_angle_sr(table.area_deg2);
        skips.log_summary();

        Ok((
            BackgroundSpectrum {
                wavelength_aa: self.grid.clone(),
                intensity,
            },
            skips,
        ))
    }

    /// Resolve the (L_FIR, T_eqv, mask) arrays for one snapshot, or record
    /// why the snapshot contributes nothing.
    fn load_snapshot_state(
        &self,
        provider: &dyn CatalogueProvider,
        snap: u32,
        skips: &mut SkipCounts,
    ) -> Option<SnapshotState> {
        let catalogue = match provider.catalogue(snap) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(snap, %err, "skipping snapshot");
                skips.missing_catalogue += 1;
                return None;
            }
        };

        let l_fir = match catalogue.galaxy_property(properties::L_FIR) {
            Ok(v) => v.to_owned(),
            Err(err) => {
                tracing::warn!(snap, %err, "skipping snapshot");
                skips.missing_property += 1;
                return None;
            }
        };

        let dust = catalogue.galaxy_property(properties::DUST_MASS);
        let gas = catalogue.galaxy_property(properties::GAS_MASS);
        let metallicity = catalogue.galaxy_property(properties::METALLICITY_MASS_WEIGHTED);
        let (dust, gas, metallicity) = match (dust, gas, metallicity) {
            (Ok(d), Ok(g), Ok(m)) => (d, g, m),
            _ => {
                tracing::warn!(snap, "skipping snapshot (dust state unavailable)");
                skips.missing_property += 1;
                return None;
            }
        };

        let (t_eqv, valid) =
            equivalent_dust_temperature(dust, gas, metallicity, catalogue.redshift());

        Some(SnapshotState {
            l_fir,
            t_eqv,
            valid,
        })
    }
}
