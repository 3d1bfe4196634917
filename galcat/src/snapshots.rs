//! Snapshot enumeration for a configured simulation.
//!
//! Scans the catalogue directory for files matching the snapshot naming
//! pattern and reads each one's header metadata. Files that fail to load
//! (typically very early snapshots with no halo data) are skipped with a
//! warning rather than failing the scan.

use std::path::PathBuf;

use tracing::warn;

use crate::catalogue::{CatalogueError, SnapshotCatalogue};
use crate::config::SimulationConfig;
use crate::json_snapshot::JsonSnapshot;

/// Metadata for one available snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotRecord {
    /// Snapshot number
    pub snap: u32,
    /// Snapshot redshift
    pub redshift: f64,
    /// Comoving box side length in Mpc
    pub box_size_mpc: f64,
    /// Catalogue file path
    pub path: PathBuf,
}

/// Parse the snapshot number out of a catalogue file name.
fn snapshot_number(file_name: &str, prefix: &str) -> Option<u32> {
    file_name
        .strip_prefix(prefix)?
        .strip_prefix('_')?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

/// Enumerate available snapshots, sorted ascending by snapshot number.
///
/// Unreadable catalogue files are skipped with a warning; an unreadable
/// catalogue directory is an error.
pub fn available_snapshots(
    config: &SimulationConfig,
) -> Result<Vec<SnapshotRecord>, CatalogueError> {
    let entries =
        std::fs::read_dir(&config.catalogue_dir).map_err(|source| CatalogueError::Io {
            path: config.catalogue_dir.clone(),
            source,
        })?;

    let mut records = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(snap) = snapshot_number(name, &config.snapshot_prefix) else {
            continue;
        };

        match JsonSnapshot::load(&path) {
            Ok(catalogue) => records.push(SnapshotRecord {
                snap,
                redshift: catalogue.redshift(),
                box_size_mpc: catalogue.box_size_mpc(),
                path,
            }),
            Err(err) => {
                warn!(snap, %err, "skipping snapshot (no usable catalogue)");
            }
        }
    }

    records.sort_by_key(|r| r.snap);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CosmologyName;
    use crate::synthetic::SyntheticCatalogue;
    use std::fs;

    fn test_config(dir: &std::path::Path) -> SimulationConfig {
        SimulationConfig {
            name: "m25n256".to_string(),
            box_size_mpc_h: 25.0,
            catalogue_dir: dir.to_path_buf(),
            snapshot_prefix: "m25n256".to_string(),
            cosmology: CosmologyName::Planck15,
        }
    }

    #[test]
    fn test_enumeration_sorted_and_filtered() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = test_config(dir.path());

        for (snap, z) in [(120u32, 1.0), (100, 2.5), (151, 0.0)] {
            let cat = SyntheticCatalogue::random(z, 25.0, 3, Some(snap as u64));
            JsonSnapshot::write(&config.catalogue_path(snap), &cat).unwrap();
        }
        // Unrelated and corrupt files are ignored / skipped
        fs::write(dir.path().join("README.txt"), "not a snapshot").unwrap();
        fs::write(dir.path().join("m25n256_050.json"), "{ corrupt").unwrap();

        let records = available_snapshots(&config).unwrap();
        let snaps: Vec<u32> = records.iter().map(|r| r.snap).collect();
        assert_eq!(snaps, vec![100, 120, 151]);
        assert!((records[0].redshift - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_directory() {
        let config = test_config(std::path::Path::new("/nonexistent/groups"));
        assert!(available_snapshots(&config).is_err());
    }

    #[test]
    fn test_snapshot_number_parsing() {
        assert_eq!(snapshot_number("m25n256_042.json", "m25n256"), Some(42));
        assert_eq!(snapshot_number("m25n256_7.json", "m25n256"), Some(7));
        assert_eq!(snapshot_number("other_042.json", "m25n256"), None);
        assert_eq!(snapshot_number("m25n256_042.hdf5", "m25n256"), None);
    }
}
