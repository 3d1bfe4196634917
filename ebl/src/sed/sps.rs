//! Stellar population spectra.
//!
//! The optical/near-IR branch needs a rest-frame spectrum per unit stellar
//! mass for a population of given metallicity and age. Full population-
//! synthesis libraries are external collaborators behind the `SpsModel`
//! trait; this module ships `BlackbodyPopulation`, a single-temperature
//! photosphere stand-in with age- and metallicity-dependent effective
//! temperature, which keeps the pipeline exercisable end to end without a
//! synthesis library installed.

use ndarray::Array1;
use once_cell::sync::Lazy;
use thiserror::Error;

use cosmology::SI;

use super::grid::log_grid;

/// Errors from stellar population spectrum generation
#[derive(Debug, Error)]
pub enum SpsError {
    #[error("invalid population age: {0} Gyr")]
    InvalidAge(f64),

    #[error("invalid metallicity (log10 Z/Zsun): {0}")]
    InvalidMetallicity(f64),
}

/// A rest-frame population spectrum per unit stellar mass.
pub struct SpsSpectrum {
    /// Rest-frame wavelength grid in angstrom
    pub wavelength_aa: Array1<f64>,
    /// Luminosity density in solar luminosities per Hz per solar mass
    pub l_nu_per_msun: Array1<f64>,
}

/// Stellar population synthesis collaborator.
///
/// # Arguments (per call)
/// * `log_z_solar` - Metallicity as log10(Z / Z⊙)
/// * `age_gyr` - Population age in Gyr
pub trait SpsModel {
    fn spectrum(&self, log_z_solar: f64, age_gyr: f64) -> Result<SpsSpectrum, SpsError>;
}

/// Solar-calibrated reference age, Gyr
const SOLAR_AGE_GYR: f64 = 4.6;
/// Solar effective temperature, K
const SOLAR_T_EFF_K: f64 = 5772.0;

static DEFAULT_WAVELENGTHS: Lazy<Array1<f64>> = Lazy::new(|| log_grid(1e2, 1e6, 512));

/// Single-temperature blackbody photosphere per unit stellar mass.
///
/// Effective temperature falls with age as (t/t⊙)^(−1/4) and shifts
/// slightly with metallicity (metal-rich populations are redder);
/// bolometric output per unit mass fades as (t/t⊙)^(−0.7). The spectral
/// shape is the Planck function per unit frequency, normalized so the
/// frequency integral equals the bolometric luminosity.
pub struct BlackbodyPopulation {
    wavelength_aa: Array1<f64>,
}

impl BlackbodyPopulation {
    /// Create a population model on the default wavelength grid
    /// (100 Å – 10⁶ Å, 512 points).
    pub fn new() -> Self {
        Self {
            wavelength_aa: DEFAULT_WAVELENGTHS.clone(),
        }
    }

    /// Create a population model on a custom rest-frame grid.
    pub fn with_grid(wavelength_aa: Array1<f64>) -> Self {
        Self { wavelength_aa }
    }

    /// Effective photosphere temperature in Kelvin.
    fn effective_temperature_k(log_z_solar: f64, age_gyr: f64) -> f64 {
        let t = SOLAR_T_EFF_K
            * (age_gyr / SOLAR_AGE_GYR).powf(-0.25)
            * 10f64.powf(-0.05 * log_z_solar);
        t.clamp(2500.0, 30000.0)
    }

    /// Bolometric luminosity per unit stellar mass, in L⊙/M⊙.
    fn bolometric_per_msun(age_gyr: f64) -> f64 {
        (age_gyr / SOLAR_AGE_GYR).powf(-0.7).clamp(1e-3, 1e3)
    }
}

impl Default for BlackbodyPopulation {
    fn default() -> Self {
        Self::new()
    }
}

impl SpsModel for BlackbodyPopulation {
    fn spectrum(&self, log_z_solar: f64, age_gyr: f64) -> Result<SpsSpectrum, SpsError> {
        if !age_gyr.is_finite() || age_gyr <= 0.0 {
            return Err(SpsError::InvalidAge(age_gyr));
        }
        if !log_z_solar.is_finite() {
            return Err(SpsError::InvalidMetallicity(log_z_solar));
        }

        let temperature = Self::effective_temperature_k(log_z_solar, age_gyr);
        let l_bol = Self::bolometric_per_msun(age_gyr);

        // Planck shape per unit frequency on the wavelength grid
        let shape: Array1<f64> = self.wavelength_aa.mapv(|wl_aa| {
            let lam_m = wl_aa * SI::ANGSTROM_IN_M;
            let nu = SI::SPEED_OF_LIGHT / lam_m;
            let x = (SI::PLANCK_CONSTANT * nu / (SI::BOLTZMANN_CONSTANT * temperature))
                .clamp(0.0, 700.0);
            2.0 * SI::PLANCK_CONSTANT * nu.powi(3)
                / (SI::SPEED_OF_LIGHT * SI::SPEED_OF_LIGHT)
                / x.exp_m1()
        });

        // Trapezoidal frequency integral; ν runs opposite to λ, so take
        // the magnitude of each step
        let n = self.wavelength_aa.len();
        let mut integral = 0.0;
        for i in 1..n {
            let nu_a = SI::SPEED_OF_LIGHT / (self.wavelength_aa[i - 1] * SI::ANGSTROM_IN_M);
            let nu_b = SI::SPEED_OF_LIGHT / (self.wavelength_aa[i] * SI::ANGSTROM_IN_M);
            integral += 0.5 * (shape[i - 1] + shape[i]) * (nu_a - nu_b).abs();
        }
        if integral <= 0.0 || !integral.is_finite() {
            return Err(SpsError::InvalidAge(age_gyr));
        }

        Ok(SpsSpectrum {
            wavelength_aa: self.wavelength_aa.clone(),
            l_nu_per_msun: shape * (l_bol / integral),
        })
    }
}
