//! Carried statistics sidecar.
//!
//! A year short-circuited by its cleaned checkpoint still has to hand the
//! next year the statistics it produced, so they are stored next to it.

use std::path::Path;

use brfss_model::CarriedStats;

use crate::error::{IngestError, Result};
use crate::layout::partial_path;

pub fn save_carried_stats(path: &Path, stats: &CarriedStats) -> Result<()> {
    let json = serde_json::to_vec_pretty(stats).map_err(|source| IngestError::Stats {
        path: path.to_path_buf(),
        source,
    })?;
    let part = partial_path(path);
    std::fs::write(&part, json).map_err(|e| IngestError::write(&part, e))?;
    std::fs::rename(&part, path).map_err(|e| IngestError::write(path, e))
}

/// Load a sidecar; `None` when the file does not exist.
pub fn load_carried_stats(path: &Path) -> Result<Option<CarriedStats>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(IngestError::read(path, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| IngestError::Stats {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brfss_cleaned_2020.modes.json");
        assert_eq!(load_carried_stats(&path).unwrap(), None);

        let stats: CarriedStats = [("GenHlth".to_string(), 2.0), ("Sex".to_string(), 0.0)]
            .into_iter()
            .collect();
        save_carried_stats(&path, &stats).unwrap();
        assert_eq!(load_carried_stats(&path).unwrap(), Some(stats));
    }

    #[test]
    fn test_corrupt_sidecar_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modes.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            load_carried_stats(&path),
            Err(IngestError::Stats { .. })
        ));
    }
}
