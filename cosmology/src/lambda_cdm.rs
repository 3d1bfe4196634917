//! Flat ΛCDM background cosmology.
//!
//! Distances and ages for a spatially-flat universe with matter and a
//! cosmological constant. Radiation and neutrino contributions are
//! neglected; at the redshifts sampled by galaxy catalogues (z ≲ 20) the
//! difference from the full Planck15 background is well below a percent.
//!
//! # Conventions
//! - Distances: comoving megaparsecs unless the method name says otherwise
//! - Ages: gigayears
//! - Hubble constant: km/s/Mpc

use thiserror::Error;

use crate::constants::SI;

/// Errors from cosmological distance/age evaluation
#[derive(Debug, Error)]
pub enum CosmologyError {
    #[error("invalid redshift: {0} (must be finite and >= 0)")]
    InvalidRedshift(f64),
}

/// A flat ΛCDM cosmology defined by H0 and Ωm.
///
/// Construct once and pass explicitly into every component that needs
/// distances; there is no global cosmology singleton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatLambdaCdm {
    /// Hubble constant in km/s/Mpc
    hubble_constant: f64,
    /// Matter density parameter at z = 0
    omega_matter: f64,
}

impl FlatLambdaCdm {
    /// Create a cosmology from H0 (km/s/Mpc) and Ωm.
    ///
    /// # Panics
    /// If either parameter is non-finite or outside its physical range.
    pub fn new(hubble_constant: f64, omega_matter: f64) -> Self {
        assert!(
            hubble_constant.is_finite() && hubble_constant > 0.0,
            "Hubble constant must be positive, got: {}",
            hubble_constant
        );
        assert!(
            omega_matter.is_finite() && omega_matter > 0.0 && omega_matter <= 1.0,
            "Omega_m must be in (0, 1], got: {}",
            omega_matter
        );

        Self {
            hubble_constant,
            omega_matter,
        }
    }

    /// The Planck Collaboration 2015 parameters (H0 = 67.74, Ωm = 0.3089),
    /// the background used throughout the snapshot catalogues.
    pub fn planck15() -> Self {
        Self::new(67.74, 0.3089)
    }

    /// Hubble constant in km/s/Mpc
    pub fn hubble_constant(&self) -> f64 {
        self.hubble_constant
    }

    /// Matter density parameter at z = 0
    pub fn omega_matter(&self) -> f64 {
        self.omega_matter
    }

    /// Dark-energy density parameter (flatness: ΩΛ = 1 − Ωm)
    pub fn omega_lambda(&self) -> f64 {
        1.0 - self.omega_matter
    }

    /// Hubble distance c/H0 in Mpc
    pub fn hubble_distance_mpc(&self) -> f64 {
        SI::SPEED_OF_LIGHT_KM_S / self.hubble_constant
    }

    /// Dimensionless Hubble parameter E(z) = H(z)/H0
    pub fn efunc(&self, z: f64) -> f64 {
        let a = 1.0 + z;
        (self.omega_matter * a * a * a + self.omega_lambda()).sqrt()
    }

    /// Line-of-sight comoving distance to redshift z, in Mpc.
    ///
    /// D_C = D_H ∫₀ᶻ dz'/E(z'), evaluated by composite Simpson
    /// integration with a step count scaled to the interval.
    pub fn comoving_distance_mpc(&self, z: f64) -> Result<f64, CosmologyError> {
        if !z.is_finite() || z < 0.0 {
            return Err(CosmologyError::InvalidRedshift(z));
        }
        if z == 0.0 {
            return Ok(0.0);
        }

        // Simpson needs an even interval count; 256 per unit redshift keeps
        // the quadrature error far below the 1e-4 redshift tolerance the
        // lightcone inversion requires.
        let n = (((z * 256.0).ceil() as usize).max(64) + 1) & !1;
        let h = z / n as f64;

        let mut sum = 1.0 / self.efunc(0.0) + 1.0 / self.efunc(z);
        for i in 1..n {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            sum += weight / self.efunc(i as f64 * h);
        }

        Ok(self.hubble_distance_mpc() * sum * h / 3.0)
    }

    /// Transverse comoving distance; equal to the line-of-sight comoving
    /// distance in a flat universe.
    pub fn comoving_transverse_distance_mpc(&self, z: f64) -> Result<f64, CosmologyError> {
        self.comoving_distance_mpc(z)
    }

    /// Luminosity distance in Mpc: d_L = (1 + z) D_C
    pub fn luminosity_distance_mpc(&self, z: f64) -> Result<f64, CosmologyError> {
        Ok((1.0 + z) * self.comoving_distance_mpc(z)?)
    }

    /// Luminosity distance in centimeters, for flux conversions.
    pub fn luminosity_distance_cm(&self, z: f64) -> Result<f64, CosmologyError> {
        Ok(self.luminosity_distance_mpc(z)? * SI::MPC_IN_CM)
    }

    /// Comoving transverse scale at redshift z, in Mpc per degree.
    ///
    /// This is the relation used to size a simulation sub-volume so it
    /// subtends a requested angular field.
    pub fn mpc_per_degree(&self, z: f64) -> Result<f64, CosmologyError> {
        Ok(self.comoving_transverse_distance_mpc(z)? * std::f64::consts::PI / 180.0)
    }

    /// Age of the universe at redshift z, in Gyr.
    ///
    /// Closed form for flat matter+Λ:
    /// t(z) = 2/(3 H0 √ΩΛ) · asinh(√(ΩΛ/Ωm) (1+z)^(−3/2))
    pub fn age_gyr(&self, z: f64) -> Result<f64, CosmologyError> {
        if !z.is_finite() || z < 0.0 {
            return Err(CosmologyError::InvalidRedshift(z));
        }

        let h0_per_gyr = self.hubble_constant / SI::GYR_PER_KM_S_MPC;
        let omega_l = self.omega_lambda();
        let arg = (omega_l / self.omega_matter).sqrt() * (1.0 + z).powf(-1.5);

        Ok(2.0 / (3.0 * h0_per_gyr * omega_l.sqrt()) * arg.asinh())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hubble_distance() {
        let cosmo = FlatLambdaCdm::planck15();
        assert_relative_eq!(cosmo.hubble_distance_mpc(), 4425.7, epsilon = 0.5);
    }

    #[test]
    fn test_comoving_distance_planck15() {
        // astropy Planck15: comoving_distance(1.0) = 3395.9 Mpc
        let cosmo = FlatLambdaCdm::planck15();
        let d = cosmo.comoving_distance_mpc(1.0).unwrap();
        assert_relative_eq!(d, 3396.0, max_relative = 0.005);
    }

    #[test]
    fn test_comoving_distance_monotonic() {
        let cosmo = FlatLambdaCdm::planck15();
        let mut last = 0.0;
        for i in 1..40 {
            let z = i as f64 * 0.25;
            let d = cosmo.comoving_distance_mpc(z).unwrap();
            assert!(d > last, "D_C must increase with z ({} at z={})", d, z);
            last = d;
        }
    }

    #[test]
    fn test_luminosity_distance_relation() {
        let cosmo = FlatLambdaCdm::planck15();
        let z = 2.3;
        let dc = cosmo.comoving_distance_mpc(z).unwrap();
        let dl = cosmo.luminosity_distance_mpc(z).unwrap();
        assert_relative_eq!(dl, (1.0 + z) * dc, epsilon = 1e-9);
    }

    #[test]
    fn test_age_at_present() {
        // astropy Planck15 (matter+Λ only): age(0) ≈ 13.80 Gyr
        let cosmo = FlatLambdaCdm::planck15();
        assert_relative_eq!(cosmo.age_gyr(0.0).unwrap(), 13.80, max_relative = 0.005);
    }

    #[test]
    fn test_age_decreases_with_redshift() {
        let cosmo = FlatLambdaCdm::planck15();
        let t0 = cosmo.age_gyr(0.0).unwrap();
        let t1 = cosmo.age_gyr(1.0).unwrap();
        let t6 = cosmo.age_gyr(6.0).unwrap();
        assert!(t0 > t1 && t1 > t6);
        // Universe at z=6 was younger than 1.5 Gyr
        assert!(t6 < 1.5);
    }

    #[test]
    fn test_mpc_per_degree() {
        let cosmo = FlatLambdaCdm::planck15();
        let scale = cosmo.mpc_per_degree(1.0).unwrap();
        let dc = cosmo.comoving_distance_mpc(1.0).unwrap();
        assert_relative_eq!(scale, dc * std::f64::consts::PI / 180.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_redshift() {
        let cosmo = FlatLambdaCdm::planck15();
        assert!(cosmo.comoving_distance_mpc(-0.1).is_err());
        assert!(cosmo.comoving_distance_mpc(f64::NAN).is_err());
        assert!(cosmo.age_gyr(-1.0).is_err());
    }

    #[test]
    #[should_panic(expected = "Hubble constant must be positive")]
    fn test_bad_hubble_constant() {
        FlatLambdaCdm::new(-70.0, 0.3);
    }
}
