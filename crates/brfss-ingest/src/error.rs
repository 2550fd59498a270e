//! Error types for survey data ingestion.

use std::path::PathBuf;
use thiserror::Error;

use brfss_xpt::XptError;

/// Failure to obtain a year's archive.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The archive is not published (HTTP 404). Expected for future years.
    #[error("archive not found: {url}")]
    NotFound { url: String },

    /// Any other network or protocol failure.
    #[error("failed to download {url}: {message}")]
    Transport { url: String, message: String },

    /// The archive could not be written locally.
    #[error("failed to write archive {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors that can occur while turning an archive into a table on disk.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to open or read the zip archive.
    #[error("failed to read archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// The archive contains no transport file.
    #[error("no .XPT file in archive {path}")]
    NoXptInArchive { path: PathBuf },

    /// The transport file could not be decoded with any supported encoding.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: XptError,
    },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to write CSV with Polars.
    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    /// Carried statistics sidecar is unreadable.
    #[error("invalid statistics file {path}: {source}")]
    Stats {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
