//! Synthetic in-memory catalogues for tests and demonstrations.
//!
//! Galaxies are placed either explicitly or uniformly at random in the
//! box; property arrays are attached by name afterwards.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, RngCore, SeedableRng};

use crate::catalogue::{CatalogueError, SnapshotCatalogue};

/// A catalogue assembled in memory.
pub struct SyntheticCatalogue {
    redshift: f64,
    box_size_mpc: f64,
    positions: Vec<[f64; 3]>,
    positions_array: Array2<f64>,
    properties: BTreeMap<String, Array1<f64>>,
}

impl SyntheticCatalogue {
    /// Create an empty catalogue with the given snapshot metadata.
    pub fn new(redshift: f64, box_size_mpc: f64) -> Self {
        Self {
            redshift,
            box_size_mpc,
            positions: Vec::new(),
            positions_array: Array2::zeros((0, 3)),
            properties: BTreeMap::new(),
        }
    }

    /// Create a catalogue of n galaxies placed uniformly in the box.
    ///
    /// # Arguments
    /// * `seed` - Optional random seed. If None, uses random seed
    pub fn random(redshift: f64, box_size_mpc: f64, n: usize, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or(thread_rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);

        let mut cat = Self::new(redshift, box_size_mpc);
        for _ in 0..n {
            cat.push_galaxy([
                rng.gen::<f64>() * box_size_mpc,
                rng.gen::<f64>() * box_size_mpc,
                rng.gen::<f64>() * box_size_mpc,
            ]);
        }
        cat
    }

    /// Append a galaxy at the given comoving position; returns its index.
    pub fn push_galaxy(&mut self, position_mpc: [f64; 3]) -> usize {
        self.positions.push(position_mpc);
        self.rebuild_positions();
        self.positions.len() - 1
    }

    /// Attach a named per-galaxy property array.
    ///
    /// # Panics
    /// If the array length disagrees with the galaxy count.
    pub fn set_property(&mut self, name: &str, values: Array1<f64>) {
        assert_eq!(
            values.len(),
            self.positions.len(),
            "property '{}' length must match galaxy count",
            name
        );
        self.properties.insert(name.to_string(), values);
    }

    fn rebuild_positions(&mut self) {
        let n = self.positions.len();
        let mut array = Array2::zeros((n, 3));
        for (i, pos) in self.positions.iter().enumerate() {
            array[[i, 0]] = pos[0];
            array[[i, 1]] = pos[1];
            array[[i, 2]] = pos[2];
        }
        self.positions_array = array;
    }
}

impl SnapshotCatalogue for SyntheticCatalogue {
    fn redshift(&self) -> f64 {
        self.redshift
    }

    fn box_size_mpc(&self) -> f64 {
        self.box_size_mpc
    }

    fn galaxy_positions(&self) -> &Array2<f64> {
        &self.positions_array
    }

    fn galaxy_property(&self, name: &str) -> Result<ArrayView1<'_, f64>, CatalogueError> {
        self.properties
            .get(name)
            .map(|a| a.view())
            .ok_or_else(|| CatalogueError::MissingProperty(name.to_string()))
    }

    fn property_names(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_placement_in_box() {
        let cat = SyntheticCatalogue::random(2.0, 50.0, 200, Some(7));
        assert_eq!(cat.len(), 200);

        let positions = cat.galaxy_positions();
        for i in 0..cat.len() {
            for axis in 0..3 {
                let v = positions[[i, axis]];
                assert!((0.0..50.0).contains(&v), "coordinate {} out of box", v);
            }
        }
    }

    #[test]
    fn test_seed_reproducibility() {
        let a = SyntheticCatalogue::random(1.0, 25.0, 10, Some(42));
        let b = SyntheticCatalogue::random(1.0, 25.0, 10, Some(42));
        assert_eq!(a.galaxy_positions(), b.galaxy_positions());
    }

    #[test]
    #[should_panic(expected = "length must match galaxy count")]
    fn test_property_length_check() {
        let mut cat = SyntheticCatalogue::new(0.0, 10.0);
        cat.push_galaxy([1.0, 1.0, 1.0]);
        cat.set_property("masses.stellar", ndarray::array![1.0, 2.0]);
    }
}
