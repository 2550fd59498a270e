//! Column harmonization and imputation engine.
//!
//! Each step takes a table, the schema registry and the year's diagnostic
//! sink, and returns a new table. [`clean_year`] runs them in order.

pub mod binary;
pub mod error;
pub mod frame;
pub mod harmonize;
pub mod impute;
pub mod pipeline;
pub mod sentinel;
pub mod target;

pub use binary::finalize_binary;
pub use error::TransformError;
pub use harmonize::harmonize;
pub use impute::{Imputation, impute, mode, rounded_mean};
pub use pipeline::{CleanedYear, clean_year};
pub use sentinel::normalize_sentinels;
pub use target::encode_target;
