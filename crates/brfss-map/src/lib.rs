#![deny(unsafe_code)]

//! Column-similarity inspection.
//!
//! A diagnostic for registry authoring: for each year it lists, per known
//! alias, the raw column with the most similar name. It does not feed the
//! cleaning path.

pub mod error;
pub mod inspect;
pub mod score;

pub use error::MapError;
pub use inspect::{AliasMatch, inspect_year, write_report};
pub use score::{Candidate, ColumnMatcher, DEFAULT_CUTOFF};
