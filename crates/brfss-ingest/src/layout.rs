//! On-disk layout of stage checkpoints.
//!
//! Every artifact is addressed by survey year alone, so a re-run finds the
//! products of earlier runs without any index.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Default location of the published annual archives.
pub const DEFAULT_BASE_URL: &str = "https://www.cdc.gov/brfss/annual_data";

/// URL of a year's transport archive.
pub fn archive_url(base_url: &str, year: i32) -> String {
    format!(
        "{}/{year}/files/LLCP{year}XPT.zip",
        base_url.trim_end_matches('/')
    )
}

/// Paths of every per-year artifact below a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("processed")
    }

    pub fn cleaned_dir(&self) -> PathBuf {
        self.root.join("cleaned")
    }

    /// `raw/LLCP<year>.zip`
    pub fn archive_path(&self, year: i32) -> PathBuf {
        self.raw_dir().join(format!("LLCP{year}.zip"))
    }

    /// `raw/LLCP<year>/`
    pub fn extract_dir(&self, year: i32) -> PathBuf {
        self.raw_dir().join(format!("LLCP{year}"))
    }

    /// `raw/LLCP<year>/LLCP<year>.XPT`
    pub fn xpt_path(&self, year: i32) -> PathBuf {
        self.extract_dir(year).join(format!("LLCP{year}.XPT"))
    }

    /// `processed/brfss_<year>.csv`
    pub fn raw_table_path(&self, year: i32) -> PathBuf {
        self.processed_dir().join(format!("brfss_{year}.csv"))
    }

    /// `cleaned/brfss_cleaned_<year>.csv`
    pub fn cleaned_path(&self, year: i32) -> PathBuf {
        self.cleaned_dir().join(format!("brfss_cleaned_{year}.csv"))
    }

    /// `cleaned/brfss_cleaned_<year>.modes.json`
    pub fn carried_stats_path(&self, year: i32) -> PathBuf {
        self.cleaned_dir()
            .join(format!("brfss_cleaned_{year}.modes.json"))
    }

    /// Create the stage directories.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.raw_dir(), self.processed_dir(), self.cleaned_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| IngestError::write(&dir, e))?;
        }
        Ok(())
    }
}

/// Sibling path used while an artifact is being written.
pub(crate) fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_paths() {
        let layout = DataLayout::new("data");
        assert_eq!(layout.archive_path(2020), Path::new("data/raw/LLCP2020.zip"));
        assert_eq!(
            layout.xpt_path(2020),
            Path::new("data/raw/LLCP2020/LLCP2020.XPT")
        );
        assert_eq!(
            layout.raw_table_path(2020),
            Path::new("data/processed/brfss_2020.csv")
        );
        assert_eq!(
            layout.cleaned_path(2020),
            Path::new("data/cleaned/brfss_cleaned_2020.csv")
        );
        assert_eq!(
            layout.carried_stats_path(2020),
            Path::new("data/cleaned/brfss_cleaned_2020.modes.json")
        );
    }

    #[test]
    fn test_archive_url() {
        assert_eq!(
            archive_url(DEFAULT_BASE_URL, 2015),
            "https://www.cdc.gov/brfss/annual_data/2015/files/LLCP2015XPT.zip"
        );
        assert_eq!(
            archive_url("http://localhost:8080/", 2024),
            "http://localhost:8080/2024/files/LLCP2024XPT.zip"
        );
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("data/raw/LLCP2020.zip")),
            Path::new("data/raw/LLCP2020.zip.part")
        );
    }
}
