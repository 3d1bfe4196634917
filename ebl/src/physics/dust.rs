//! Equivalent dust temperature from dust-to-metal ratios.
//!
//! An empirical scaling relation mapping a galaxy's dust-to-metal-to-gas
//! ratio δ = M_dust / (Z · M_gas) and redshift to a single equivalent
//! dust temperature:
//!
//!   log10 T = a + b·log10(δ/0.4) + c·log10(1+z) + log10 25
//!
//! with a = −0.05, b = −0.15, c = 0.36. The relation is calibrated in
//! base-10 logarithms; δ = 0.4 at z = 0 gives T ≈ 22.3 K.
//!
//! Galaxies with a non-finite or non-positive δ have no defined
//! temperature: they get a NaN sentinel and a false validity flag and must
//! be excluded from any downstream summation rather than treated as zero.

use ndarray::{Array1, ArrayView1};

const COEFF_A: f64 = -0.05;
const COEFF_B: f64 = -0.15;
const COEFF_C: f64 = 0.36;
/// Pivot dust-to-metal ratio of the calibration
const DELTA_PIVOT: f64 = 0.4;
/// Temperature normalization of the calibration, Kelvin
const T_NORM_K: f64 = 25.0;

/// Equivalent dust temperature for every galaxy in a snapshot.
///
/// # Arguments
/// * `dust_mass` - Dust masses in solar masses
/// * `gas_mass` - Gas masses in solar masses
/// * `metallicity` - Mass-weighted metal mass fractions
/// * `redshift` - Snapshot redshift
///
/// # Returns
/// Temperatures in Kelvin (NaN where undefined) and the validity mask.
///
/// # Panics
/// If the input arrays differ in length.
pub fn equivalent_dust_temperature(
    dust_mass: ArrayView1<f64>,
    gas_mass: ArrayView1<f64>,
    metallicity: ArrayView1<f64>,
    redshift: f64,
) -> (Array1<f64>, Vec<bool>) {
    let n = dust_mass.len();
    assert_eq!(n, gas_mass.len(), "mass arrays must have same length");
    assert_eq!(n, metallicity.len(), "mass arrays must have same length");

    let mut temperature = Array1::from_elem(n, f64::NAN);
    let mut valid = vec![false; n];

    let z_term = COEFF_C * (1.0 + redshift).log10() + T_NORM_K.log10();

    for i in 0..n {
        let delta = dust_mass[i] / (metallicity[i] * gas_mass[i]);
        if !delta.is_finite() || delta <= 0.0 {
            continue;
        }

        let log_t = COEFF_A + COEFF_B * (delta / DELTA_PIVOT).log10() + z_term;
        temperature[i] = 10f64.powf(log_t);
        valid[i] = true;
    }

    (temperature, valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_pivot_value() {
        // δ = 0.4 at z = 0: log10 T = −0.05 + log10 25 → T = 25·10^−0.05
        let dust = array![0.4];
        let gas = array![1.0];
        let metallicity = array![1.0];
        let (t, valid) =
            equivalent_dust_temperature(dust.view(), gas.view(), metallicity.view(), 0.0);

        assert!(valid[0]);
        assert_relative_eq!(t[0], 25.0 * 10f64.powf(-0.05), epsilon = 1e-10);
        assert_relative_eq!(t[0], 22.29, epsilon = 0.01);
    }

    #[test]
    fn test_valid_inputs_give_finite_positive_temperature() {
        let dust = array![1e6, 3e7, 5e5];
        let gas = array![1e9, 5e9, 2e8];
        let metallicity = array![0.02, 0.008, 0.001];
        let (t, valid) =
            equivalent_dust_temperature(dust.view(), gas.view(), metallicity.view(), 2.0);

        for i in 0..3 {
            assert!(valid[i]);
            assert!(t[i].is_finite() && t[i] > 0.0);
        }
    }

    #[test]
    fn test_invalid_entries_masked() {
        let dust = array![1e6, 0.0, 1e6, 1e6, f64::NAN];
        let gas = array![0.0, 1e9, 1e9, -1e9, 1e9];
        let metallicity = array![0.02, 0.02, 0.0, 0.02, 0.02];
        let (t, valid) =
            equivalent_dust_temperature(dust.view(), gas.view(), metallicity.view(), 1.0);

        // zero gas → infinite δ; zero dust → δ = 0; zero metallicity →
        // infinite δ; negative gas → δ < 0; NaN dust → NaN δ
        for i in 0..5 {
            assert!(!valid[i], "entry {} should be invalid", i);
            assert!(t[i].is_nan());
        }
    }

    #[test]
    fn test_temperature_rises_with_redshift() {
        let dust = array![0.4];
        let gas = array![1.0];
        let metallicity = array![1.0];
        let (t0, _) =
            equivalent_dust_temperature(dust.view(), gas.view(), metallicity.view(), 0.0);
        let (t3, _) =
            equivalent_dust_temperature(dust.view(), gas.view(), metallicity.view(), 3.0);

        assert!(t3[0] > t0[0]);
        // c = 0.36 → factor of 4^0.36 between z = 0 and z = 3
        assert_relative_eq!(t3[0] / t0[0], 4f64.powf(0.36), epsilon = 1e-10);
    }

    #[test]
    #[should_panic(expected = "must have same length")]
    fn test_length_mismatch() {
        let dust = array![1.0, 2.0];
        let gas = array![1.0];
        let metallicity = array![0.02];
        equivalent_dust_temperature(dust.view(), gas.view(), metallicity.view(), 0.0);
    }
}
