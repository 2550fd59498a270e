//! SAS Transport (XPT) V5 reader for BRFSS survey releases.
//!
//! The annual survey files are single-member V5 transport files with a few
//! hundred numeric variables and a handful of character ones. This crate
//! decodes them column by column:
//!
//! - IBM mainframe floats converted to IEEE `f64`
//! - SAS missing values (`.`, `._`, `.A`-`.Z`) decoded as `None`
//! - Strict UTF-8 text by default, with Latin-1 available for a retry pass
//! - Optional Polars DataFrame conversion (with `polars` feature)
//! - A V5 writer for building synthetic survey files
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use brfss_xpt::{TextEncoding, XptError, XptReaderOptions, read_xpt_with_options};
//!
//! let path = Path::new("LLCP2020.XPT");
//! let dataset = match read_xpt_with_options(path, XptReaderOptions::default()) {
//!     Err(err) if err.is_encoding() => read_xpt_with_options(
//!         path,
//!         XptReaderOptions::default().with_encoding(TextEncoding::Latin1),
//!     ),
//!     other => other,
//! }?;
//! println!("{}: {} rows", dataset.name, dataset.num_rows());
//! # Ok::<(), XptError>(())
//! ```

mod error;
pub mod float;
pub mod header;
mod reader;
mod types;
mod writer;

#[cfg(feature = "polars")]
mod polars_ext;

pub use error::{Result, XptError};

pub use types::{
    ColumnData, TextEncoding, XptColumn, XptDataset, XptReaderOptions, XptType, XptWriterOptions,
};

pub use reader::{XptReader, read_xpt, read_xpt_with_options};

pub use writer::{XptWriter, write_xpt, write_xpt_with_options};
