//! Star-forming / quenched galaxy classification.
//!
//! Splits a catalogue by specific star-formation rate against the evolving
//! threshold sSFR < 0.2 / t_H(z), where t_H is the age of the universe at
//! the snapshot redshift.

use ndarray::Array1;
use thiserror::Error;

use cosmology::{CosmologyError, FlatLambdaCdm};

use crate::catalogue::{properties, CatalogueError, SnapshotCatalogue};

/// Errors from galaxy classification
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error(transparent)]
    Cosmology(#[from] CosmologyError),
}

/// Classification result for one snapshot.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Specific star-formation rate per galaxy in 1/yr (NaN for massless)
    pub ssfr: Array1<f64>,
    /// Galaxies above the sSFR threshold
    pub star_forming: Vec<bool>,
    /// Galaxies below the sSFR threshold
    pub quenched: Vec<bool>,
    /// The threshold applied, 0.2 / t_H(z), in 1/yr
    pub ssfr_threshold: f64,
}

/// Classify all galaxies in a catalogue as star-forming or quenched.
pub fn classify_galaxies(
    catalogue: &dyn SnapshotCatalogue,
    cosmology: &FlatLambdaCdm,
) -> Result<Classification, ClassifyError> {
    let sfr = catalogue.galaxy_property(properties::SFR)?;
    let stellar_mass = catalogue.galaxy_property(properties::STELLAR_MASS)?;

    let age_yr = cosmology.age_gyr(catalogue.redshift())? * 1e9;
    let ssfr_threshold = 0.2 / age_yr;

    let n = catalogue.len();
    let mut ssfr = Array1::from_elem(n, f64::NAN);
    let mut star_forming = vec![false; n];
    let mut quenched = vec![false; n];

    for i in 0..n {
        ssfr[i] = sfr[i] / stellar_mass[i];
        // NaN sSFR (massless galaxy) compares false either way; count it
        // as quenched rather than star-forming
        if ssfr[i] >= ssfr_threshold {
            star_forming[i] = true;
        } else {
            quenched[i] = true;
        }
    }

    Ok(Classification {
        ssfr,
        star_forming,
        quenched,
        ssfr_threshold,
    })
}

/// Equal-log-width stellar mass bins over the positive masses.
///
/// Returns one bin index per galaxy (`None` for non-positive masses) and
/// the n_bins + 1 bin edges in solar masses. Galaxies at the top edge fall
/// in the last bin.
pub fn stellar_mass_bins(
    stellar_mass: &Array1<f64>,
    n_bins: usize,
) -> (Vec<Option<usize>>, Vec<f64>) {
    assert!(n_bins >= 1, "need at least one mass bin");

    let positive: Vec<f64> = stellar_mass
        .iter()
        .copied()
        .filter(|m| *m > 0.0 && m.is_finite())
        .collect();
    if positive.is_empty() {
        return (vec![None; stellar_mass.len()], Vec::new());
    }

    let log_lo = positive.iter().fold(f64::INFINITY, |a, m| a.min(m.log10()));
    let log_hi = positive.iter().fold(f64::NEG_INFINITY, |a, m| a.max(m.log10()));
    let step = (log_hi - log_lo) / n_bins as f64;

    let edges: Vec<f64> = (0..=n_bins)
        .map(|i| 10f64.powf(log_lo + step * i as f64))
        .collect();

    let indices = stellar_mass
        .iter()
        .map(|m| {
            if !(*m > 0.0) || !m.is_finite() {
                return None;
            }
            let i = if step > 0.0 {
                ((m.log10() - log_lo) / step).floor() as usize
            } else {
                0
            };
            Some(i.min(n_bins - 1))
        })
        .collect();

    (indices, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticCatalogue;
    use ndarray::array;

    #[test]
    fn test_threshold_split() {
        let mut cat = SyntheticCatalogue::new(0.0, 25.0);
        cat.push_galaxy([1.0, 1.0, 1.0]);
        cat.push_galaxy([2.0, 2.0, 2.0]);
        // t_H(0) ≈ 13.8 Gyr → threshold ≈ 1.45e-11 /yr
        cat.set_property(properties::STELLAR_MASS, array![1e10, 1e10]);
        cat.set_property(properties::SFR, array![5.0, 0.01]);

        let cosmo = FlatLambdaCdm::planck15();
        let result = classify_galaxies(&cat, &cosmo).unwrap();

        assert!(result.star_forming[0]);
        assert!(result.quenched[1]);
        assert!(result.ssfr_threshold > 1.0e-11 && result.ssfr_threshold < 2.0e-11);
    }

    #[test]
    fn test_massless_counts_as_quenched() {
        let mut cat = SyntheticCatalogue::new(1.0, 25.0);
        cat.push_galaxy([1.0, 1.0, 1.0]);
        cat.set_property(properties::STELLAR_MASS, array![0.0]);
        cat.set_property(properties::SFR, array![0.0]);

        let cosmo = FlatLambdaCdm::planck15();
        let result = classify_galaxies(&cat, &cosmo).unwrap();
        assert!(result.quenched[0]);
        assert!(!result.star_forming[0]);
    }

    #[test]
    fn test_mass_bins_cover_range() {
        let masses = array![1e8, 1e9, 1e10, 1e11, 0.0, f64::NAN];
        let (indices, edges) = stellar_mass_bins(&masses, 3);

        assert_eq!(edges.len(), 4);
        assert_eq!(indices[0], Some(0));
        assert_eq!(indices[3], Some(2)); // top edge lands in the last bin
        assert_eq!(indices[4], None);
        assert_eq!(indices[5], None);
    }

    #[test]
    fn test_mass_bins_all_invalid() {
        let masses = array![0.0, -1.0];
        let (indices, edges) = stellar_mass_bins(&masses, 4);
        assert!(indices.iter().all(|i| i.is_none()));
        assert!(edges.is_empty());
    }

    #[test]
    fn test_missing_property_is_error() {
        let mut cat = SyntheticCatalogue::new(0.5, 25.0);
        cat.push_galaxy([1.0, 1.0, 1.0]);

        let cosmo = FlatLambdaCdm::planck15();
        assert!(classify_galaxies(&cat, &cosmo).is_err());
    }
}
