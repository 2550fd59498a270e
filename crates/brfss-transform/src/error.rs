use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// None of the year's target aliases is in the raw table; the year cannot be labeled.
    #[error("year {year} has no target column (expected one of {})", candidates.join(", "))]
    SchemaGap { year: i32, candidates: Vec<String> },

    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] PolarsError),
}
