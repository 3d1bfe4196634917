//! Modified-blackbody dust emission spectra.
//!
//! The far-infrared SED of a dusty galaxy is modeled as a single-
//! temperature modified blackbody per unit wavelength:
//!
//!   S(λ) = norm · (λ / 100 µm)^β · B_λ(λ, T)
//!
//! Wavelengths cross the API in angstrom; the Planck function is evaluated
//! in SI internally. The Planck exponent hc/(λ k_B T) is clamped to
//! [0, 700] before `exp_m1` so extreme temperature/wavelength combinations
//! saturate instead of overflowing, and non-positive wavelengths or
//! temperatures are floored to a tiny epsilon rather than producing NaNs.

use ndarray::Array1;

use cosmology::SI;

/// Reference wavelength of the emissivity power law: 100 µm in meters.
const EMISSIVITY_PIVOT_M: f64 = 100e-6;

/// Floor substituted for non-positive wavelengths (m) and temperatures (K).
const TINY: f64 = 1e-10;

/// Upper clamp on the Planck exponent before exponentiation.
const MAX_EXPONENT: f64 = 700.0;

/// Modified blackbody per unit wavelength on a grid in angstrom.
///
/// # Arguments
/// * `wavelength_aa` - Wavelength grid in angstrom
/// * `temperature_k` - Dust temperature in Kelvin
/// * `beta` - Emissivity index
/// * `norm` - Multiplicative normalization
pub fn modified_blackbody(
    wavelength_aa: &Array1<f64>,
    temperature_k: f64,
    beta: f64,
    norm: f64,
) -> Array1<f64> {
    let temperature = if temperature_k <= 0.0 { TINY } else { temperature_k };

    wavelength_aa.mapv(|wl_aa| {
        let lam_m = {
            let lam = wl_aa * SI::ANGSTROM_IN_M;
            if lam <= 0.0 {
                TINY
            } else {
                lam
            }
        };

        let x = SI::PLANCK_CONSTANT * SI::SPEED_OF_LIGHT
            / (lam_m * SI::BOLTZMANN_CONSTANT * temperature);
        let x = x.clamp(0.0, MAX_EXPONENT);

        let b_lam = (2.0 * SI::PLANCK_CONSTANT * SI::SPEED_OF_LIGHT * SI::SPEED_OF_LIGHT)
            / lam_m.powi(5)
            / x.exp_m1();
        let emissivity = (lam_m / EMISSIVITY_PIVOT_M).powf(beta);

        norm * emissivity * b_lam
    })
}

/// Centered-difference spacing of a grid: one-sided at the edges,
/// (x[i+1] − x[i−1]) / 2 in the interior.
fn grid_gradient(x: &Array1<f64>) -> Array1<f64> {
    let n = x.len();
    let mut dx = Array1::zeros(n);
    if n < 2 {
        return dx;
    }

    dx[0] = x[1] - x[0];
    dx[n - 1] = x[n - 1] - x[n - 2];
    for i in 1..n - 1 {
        dx[i] = (x[i + 1] - x[i - 1]) / 2.0;
    }
    dx
}

/// Modified blackbody rescaled so its trapezoidal integral over the grid
/// equals `l_fir`.
///
/// Returns `None` if the unnormalized shape contains non-finite values or
/// the integral is non-positive or non-finite; callers must skip such
/// galaxies rather than adding a zero contribution.
pub fn normalised_mbb(
    wavelength_aa: &Array1<f64>,
    l_fir: f64,
    temperature_k: f64,
    beta: f64,
) -> Option<Array1<f64>> {
    let raw = modified_blackbody(wavelength_aa, temperature_k, beta, 1.0);
    if !raw.iter().all(|v| v.is_finite()) {
        return None;
    }

    let dlam = grid_gradient(wavelength_aa);
    let integral: f64 = raw.iter().zip(dlam.iter()).map(|(s, d)| s * d).sum();
    if integral <= 0.0 || !integral.is_finite() {
        return None;
    }

    Some(raw * (l_fir / integral))
}
