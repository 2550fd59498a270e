use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to write match report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
