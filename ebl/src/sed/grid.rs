//! Wavelength grids and interpolation.
//!
//! Spectra live on log-spaced observer-frame wavelength grids in angstrom.
//! Redshifting scales a grid by (1+z); resampling a redshifted spectrum
//! onto the shared grid uses linear interpolation with zero fill outside
//! the source support, so a spectrum contributes nothing where it is
//! undefined.

use ndarray::Array1;

/// A log-spaced grid of n points from `lo` to `hi` inclusive.
///
/// # Panics
/// If the bounds are non-positive, out of order, or n < 2.
pub fn log_grid(lo: f64, hi: f64, n: usize) -> Array1<f64> {
    assert!(lo > 0.0 && hi > lo, "need 0 < lo < hi, got {}..{}", lo, hi);
    assert!(n >= 2, "need at least 2 grid points");

    let log_lo = lo.log10();
    let step = (hi.log10() - log_lo) / (n - 1) as f64;
    Array1::from_iter((0..n).map(|i| 10f64.powf(log_lo + step * i as f64)))
}

/// Observed wavelengths emitted at redshift z: λ_obs = λ_rest (1+z).
pub fn to_observer_frame(rest: &Array1<f64>, z: f64) -> Array1<f64> {
    rest * (1.0 + z)
}

/// Rest-frame wavelengths for an observer grid: λ_rest = λ_obs / (1+z).
pub fn to_rest_frame(observed: &Array1<f64>, z: f64) -> Array1<f64> {
    observed / (1.0 + z)
}

/// Linear interpolation of (x, y) samples onto `grid`, with zero outside
/// the sampled range. `x` must be ascending.
pub fn interp_onto(grid: &Array1<f64>, x: &Array1<f64>, y: &Array1<f64>) -> Array1<f64> {
    assert_eq!(x.len(), y.len(), "sample arrays must have same length");

    let n = x.len();
    let mut out = Array1::zeros(grid.len());
    if n == 0 {
        return out;
    }

    for (gi, &g) in grid.iter().enumerate() {
        if g < x[0] || g > x[n - 1] {
            continue;
        }
        if n == 1 {
            out[gi] = y[0];
            continue;
        }

        // Rightmost sample index with x[j] <= g
        let j = match x.as_slice().and_then(|s| {
            s.partition_point(|v| *v <= g).checked_sub(1)
        }) {
            Some(j) => j.min(n - 2),
            None => continue,
        };

        let x0 = x[j];
        let x1 = x[j + 1];
        let frac = if x1 > x0 { (g - x0) / (x1 - x0) } else { 0.0 };
        out[gi] = y[j] + frac * (y[j + 1] - y[j]);
    }

    out
}
