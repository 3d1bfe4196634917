//! JSON-backed on-disk snapshot catalogues.
//!
//! One file per snapshot: redshift, box size, an n × 3 position list and a
//! dictionary of named per-galaxy arrays. Box sizes recorded in comoving
//! kpc by older catalogue writers are normalized to Mpc on load.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::catalogue::{CatalogueError, SnapshotCatalogue};

/// Box sizes above this are assumed to be kpc and divided down to Mpc.
const KPC_BOX_THRESHOLD: f64 = 1000.0;

/// Serialized catalogue layout
#[derive(Debug, Serialize, Deserialize)]
struct RawSnapshot {
    redshift: f64,
    box_size: f64,
    positions: Vec<[f64; 3]>,
    #[serde(default)]
    properties: BTreeMap<String, Vec<f64>>,
}

/// A snapshot catalogue loaded from a JSON file.
#[derive(Debug)]
pub struct JsonSnapshot {
    redshift: f64,
    box_size_mpc: f64,
    positions: Array2<f64>,
    properties: BTreeMap<String, Array1<f64>>,
}

impl JsonSnapshot {
    /// Load a catalogue from disk.
    ///
    /// # Errors
    /// - `MissingCatalogue` if the file does not exist
    /// - `Io` / `Parse` for unreadable or malformed files
    /// - `ShapeMismatch` if any property array disagrees with the galaxy count
    pub fn load(path: &Path) -> Result<Self, CatalogueError> {
        if !path.exists() {
            return Err(CatalogueError::MissingCatalogue(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|source| CatalogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawSnapshot =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                CatalogueError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        let n = raw.positions.len();
        for (name, values) in &raw.properties {
            if values.len() != n {
                return Err(CatalogueError::ShapeMismatch {
                    name: name.clone(),
                    got: values.len(),
                    expected: n,
                });
            }
        }

        let mut positions = Array2::zeros((n, 3));
        for (i, pos) in raw.positions.iter().enumerate() {
            positions[[i, 0]] = pos[0];
            positions[[i, 1]] = pos[1];
            positions[[i, 2]] = pos[2];
        }

        let box_size_mpc = if raw.box_size > KPC_BOX_THRESHOLD {
            raw.box_size / 1000.0
        } else {
            raw.box_size
        };

        Ok(Self {
            redshift: raw.redshift,
            box_size_mpc,
            positions,
            properties: raw
                .properties
                .into_iter()
                .map(|(k, v)| (k, Array1::from_vec(v)))
                .collect(),
        })
    }

    /// Write any catalogue to disk in the JSON snapshot layout.
    pub fn write(path: &Path, catalogue: &dyn SnapshotCatalogue) -> Result<(), CatalogueError> {
        let n = catalogue.len();
        let positions = catalogue.galaxy_positions();

        let mut raw = RawSnapshot {
            redshift: catalogue.redshift(),
            box_size: catalogue.box_size_mpc(),
            positions: (0..n)
                .map(|i| [positions[[i, 0]], positions[[i, 1]], positions[[i, 2]]])
                .collect(),
            properties: BTreeMap::new(),
        };
        for name in catalogue.property_names() {
            let values = catalogue.galaxy_property(&name)?;
            raw.properties.insert(name, values.to_vec());
        }

        let file = File::create(path).map_err(|source| CatalogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer(BufWriter::new(file), &raw).map_err(|source| {
            CatalogueError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

impl SnapshotCatalogue for JsonSnapshot {
    fn redshift(&self) -> f64 {
        self.redshift
    }

    fn box_size_mpc(&self) -> f64 {
        self.box_size_mpc
    }

    fn galaxy_positions(&self) -> &Array2<f64> {
        &self.positions
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
        self.positions.nrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::properties;
    use crate::synthetic::SyntheticCatalogue;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snap_042.json");

        let mut cat = SyntheticCatalogue::new(1.5, 25.0);
        cat.push_galaxy([1.0, 2.0, 3.0]);
        cat.push_galaxy([4.0, 5.0, 6.0]);
        cat.set_property(properties::STELLAR_MASS, array![1e10, 5e9]);

        JsonSnapshot::write(&path, &cat).unwrap();
        let loaded = JsonSnapshot::load(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_relative_eq!(loaded.redshift(), 1.5);
        assert_relative_eq!(loaded.box_size_mpc(), 25.0);
        assert_relative_eq!(loaded.galaxy_positions()[[1, 2]], 6.0);
        let mass = loaded.galaxy_property(properties::STELLAR_MASS).unwrap();
        assert_relative_eq!(mass[0], 1e10);
    }

    #[test]
    fn test_missing_file() {
        let err = JsonSnapshot::load(Path::new("/nonexistent/snap_000.json")).unwrap_err();
        assert!(matches!(err, CatalogueError::MissingCatalogue(_)));
    }

    #[test]
    fn test_missing_property() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snap_001.json");
        let cat = SyntheticCatalogue::new(0.5, 50.0);
        JsonSnapshot::write(&path, &cat).unwrap();

        let loaded = JsonSnapshot::load(&path).unwrap();
        let err = loaded.galaxy_property("no_such_property").unwrap_err();
        assert!(matches!(err, CatalogueError::MissingProperty(_)));
    }

    #[test]
    fn test_kpc_box_normalized() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snap_002.json");
        let raw = RawSnapshot {
            redshift: 0.1,
            box_size: 25000.0, // kpc
            positions: vec![],
            properties: BTreeMap::new(),
        };
        serde_json::to_writer(File::create(&path).unwrap(), &raw).unwrap();

        let loaded = JsonSnapshot::load(&path).unwrap();
        assert_relative_eq!(loaded.box_size_mpc(), 25.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snap_003.json");
        let mut properties_map = BTreeMap::new();
        properties_map.insert("masses.stellar".to_string(), vec![1.0, 2.0, 3.0]);
        let raw = RawSnapshot {
            redshift: 0.1,
            box_size: 25.0,
            positions: vec![[0.0; 3]],
            properties: properties_map,
        };
        serde_json::to_writer(File::create(&path).unwrap(), &raw).unwrap();

        let err = JsonSnapshot::load(&path).unwrap_err();
        assert!(matches!(err, CatalogueError::ShapeMismatch { .. }));
    }
}
