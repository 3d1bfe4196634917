//! Optical/near-infrared background aggregation.
//!
//! Every lightcone galaxy with positive stellar mass, metallicity and age
//! contributes a stellar population spectrum scaled by its mass, converted
//! to observed flux per unit frequency and resampled onto the shared
//! observer-frame grid. The summed flux over the field solid angle is the
//! optical background surface brightness in erg s⁻¹ cm⁻² Hz⁻¹ sr⁻¹.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

use ndarray::Array1;

use cosmology::{FlatLambdaCdm, SI};
use galcat::properties;

use crate::lightcone::LightconeTable;
use crate::sed::grid::{interp_onto, log_grid, to_observer_frame};
use crate::sed::sps::SpsModel;

use super::{
    solid_angle_sr, BackgroundError, BackgroundSpectrum, CatalogueProvider, SkipCounts,
};

/// Default observer-frame grid: 1000 Å – 50 000 Å
const DEFAULT_GRID_LO_AA: f64 = 1e3;
const DEFAULT_GRID_HI_AA: f64 = 5e4;
const DEFAULT_GRID_POINTS: usize = 500;

/// Per-snapshot derived state, built once per aggregation.
struct SnapshotState {
    stellar_mass: Array1<f64>,
    metallicity: Array1<f64>,
}

/// Optical/near-IR background aggregator.
pub struct OpticalBackground<S: SpsModel> {
    cosmology: FlatLambdaCdm,
    sps: S,
    grid: Array1<f64>,
    skip_snaps: BTreeSet<u32>,
}

impl<S: SpsModel> OpticalBackground<S> {
    /// Create an aggregator over the given population-synthesis model.
    pub fn new(cosmology: FlatLambdaCdm, sps: S) -> Self {
        Self {
            cosmology,
            sps,
            grid: log_grid(DEFAULT_GRID_LO_AA, DEFAULT_GRID_HI_AA, DEFAULT_GRID_POINTS),
            skip_snaps: BTreeSet::new(),
        }
    }

    /// Override the observer-frame wavelength grid (angstrom).
    pub fn with_grid(mut self, lo_aa: f64, hi_aa: f64, n: usize) -> Self {
        self.grid = log_grid(lo_aa, hi_aa, n);
        self
    }

    /// Snapshots to ignore entirely (known-bad catalogue epochs).
    pub fn with_skip_snaps(mut self, snaps: impl IntoIterator<Item = u32>) -> Self {
        self.skip_snaps = snaps.into_iter().collect();
        self
    }

    /// The observer-frame wavelength grid in angstrom.
    pub fn grid(&self) -> &Array1<f64> {
        &self.grid
    }

    /// Sum redshifted population spectra over the lightcone.
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
            if self.skip_snaps.contains(&entry.snap) {
                continue;
            }

            if !cache.contains_key(&entry.snap) {
                let state = load_snapshot_state(provider, entry.snap, &mut skips);
                cache.insert(entry.snap, state);
            }
            let Some(Some(state)) = cache.get(&entry.snap) else {
                continue;
            };

            let gi = entry.galaxy_index;
            if gi >= state.stellar_mass.len() {
                skips.stale_index += 1;
                continue;
            }

            let stellar_mass = state.stellar_mass[gi];
            let metallicity = state.metallicity[gi];
            if !(stellar_mass > 0.0 && metallicity > 0.0)
                || !stellar_mass.is_finite()
                || !metallicity.is_finite()
            {
                skips.invalid_state += 1;
                continue;
            }

            let z = entry.redshift;
            let age_gyr = match self.cosmology.age_gyr(z) {
                Ok(age) if age > 0.0 => age,
                _ => {
                    skips.invalid_state += 1;
                    continue;
                }
            };

            let log_z_solar = (metallicity / SI::SOLAR_METALLICITY).log10();
            let spectrum = match self.sps.spectrum(log_z_solar, age_gyr) {
                Ok(s) => s,
                Err(_) => {
                    skips.normalisation_failure += 1;
                    continue;
                }
            };

            let d_l_cm = match self.cosmology.luminosity_distance_cm(z) {
                Ok(d) => d,
                Err(_) => {
                    skips.invalid_state += 1;
                    continue;
                }
            };

            // L⊙/Hz per M⊙ → erg s⁻¹ cm⁻² Hz⁻¹ at the observer
            let flux_nu = spectrum.l_nu_per_msun
                * (stellar_mass * SI::SOLAR_LUMINOSITY_ERG_S / (4.0 * PI * d_l_cm * d_l_cm));

            let wave_obs = to_observer_frame(&spectrum.wavelength_aa, z);
            let resampled = interp_onto(&self.grid, &wave_obs, &flux_nu);

            if resampled.iter().all(|v| v.is_finite()) {
                total += &resampled;
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
}

/// Resolve the (stellar mass, metallicity) arrays for one snapshot.
fn load_snapshot_state(
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

    let stellar_mass = catalogue.galaxy_property(properties::STELLAR_MASS);
    let metallicity = catalogue.galaxy_property(properties::METALLICITY_STELLAR);
    match (stellar_mass, metallicity) {
        (Ok(m), Ok(z)) => Some(SnapshotState {
            stellar_mass: m.to_owned(),
            metallicity: z.to_owned(),
        }),
        _ => {
            tracing::warn!(snap, "skipping snapshot (stellar state unavailable)");
            skips.missing_property += 1;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::MemoryCatalogueProvider;
    use crate::lightcone::LightconeEntry;
    use crate::sed::sps::BlackbodyPopulation;
    use galcat::SyntheticCatalogue;
    use ndarray::array;
    use std::sync::Arc;

    fn stellar_catalogue(mass: f64, metallicity: f64) -> SyntheticCatalogue {
        let mut cat = SyntheticCatalogue::new(0.5, 25.0);
        cat.push_galaxy([1.0, 1.0, 12.5]);
        cat.set_property(properties::STELLAR_MASS, array![mass]);
        cat.set_property(properties::METALLICITY_STELLAR, array![metallicity]);
        cat
    }

    fn one_entry_table(snap: u32) -> LightconeTable {
        LightconeTable {
            simulation: "test".to_string(),
            area_deg2: 1.0,
            z_min: 0.0,
            z_max: 2.0,
            entries: vec![LightconeEntry {
                ra_deg: 0.0,
                dec_deg: 0.0,
                redshift: 0.5,
                snap,
                galaxy_index: 0,
                stellar_mass: 1e10,
            }],
        }
    }

    #[test]
    fn test_single_galaxy_contributes() {
        let aggregator =
            OpticalBackground::new(FlatLambdaCdm::planck15(), BlackbodyPopulation::new());
        let mut provider = MemoryCatalogueProvider::new();
        provider.insert(140, Arc::new(stellar_catalogue(1e10, 0.0142)));

        let (spectrum, skips) = aggregator
            .aggregate(&one_entry_table(140), &provider)
            .unwrap();
        assert!(spectrum.intensity.iter().any(|v| *v > 0.0));
        assert!(spectrum.intensity.iter().all(|v| v.is_finite()));
        assert_eq!(skips.total(), 0);
    }

    #[test]
    fn test_massless_galaxy_skipped() {
        let aggregator =
            OpticalBackground::new(FlatLambdaCdm::planck15(), BlackbodyPopulation::new());
        let mut provider = MemoryCatalogueProvider::new();
        provider.insert(140, Arc::new(stellar_catalogue(0.0, 0.0142)));

        let (spectrum, skips) = aggregator
            .aggregate(&one_entry_table(140), &provider)
            .unwrap();
        assert!(spectrum.intensity.iter().all(|v| *v == 0.0));
        assert_eq!(skips.invalid_state, 1);
    }

    #[test]
    fn test_skip_snaps_ignored_entirely() {
        let aggregator =
            OpticalBackground::new(FlatLambdaCdm::planck15(), BlackbodyPopulation::new())
                .with_skip_snaps([140]);
        let mut provider = MemoryCatalogueProvider::new();
        provider.insert(140, Arc::new(stellar_catalogue(1e10, 0.0142)));

        let (spectrum, skips) = aggregator
            .aggregate(&one_entry_table(140), &provider)
            .unwrap();
        assert!(spectrum.intensity.iter().all(|v| *v == 0.0));
        assert_eq!(skips.total(), 0);
    }

    #[test]
    fn test_brightness_scales_with_mass() {
        let provider_for = |mass: f64| {
            let mut p = MemoryCatalogueProvider::new();
            p.insert(140, Arc::new(stellar_catalogue(mass, 0.0142)));
            p
        };
        let aggregator =
            OpticalBackground::new(FlatLambdaCdm::planck15(), BlackbodyPopulation::new());

        let (light, _) = aggregator
            .aggregate(&one_entry_table(140), &provider_for(1e10))
            .unwrap();
        let (heavy, _) = aggregator
            .aggregate(&one_entry_table(140), &provider_for(1e11))
            .unwrap();

        let sum_light: f64 = light.intensity.sum();
        let sum_heavy: f64 = heavy.intensity.sum();
        assert!((sum_heavy / sum_light - 10.0).abs() < 1e-6);
    }
}
