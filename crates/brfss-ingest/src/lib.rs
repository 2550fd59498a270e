//! Retrieval and persistence for BRFSS survey years.
//!
//! Each stage of a year leaves a checkpoint on disk, addressed by year
//! through [`DataLayout`]: the downloaded archive, the extracted transport
//! file, the raw table CSV and the cleaned table CSV.

pub mod checkpoint;
pub mod checksum;
pub mod csv_table;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod layout;
pub mod xpt;

pub use checkpoint::{load_carried_stats, save_carried_stats};
pub use csv_table::{read_csv_headers, read_table_csv, write_table_csv};
pub use error::{FetchError, IngestError, Result};
pub use extract::extract_xpt;
pub use fetch::{ArchiveSource, DEFAULT_TIMEOUT, HttpArchiveSource, ensure_archive};
pub use layout::{DEFAULT_BASE_URL, DataLayout, archive_url};
pub use xpt::read_xpt_table;
