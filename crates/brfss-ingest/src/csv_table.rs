//! CSV persistence of raw and cleaned tables.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};
use crate::layout::partial_path;

/// Read a table checkpoint.
///
/// Schema inference scans the whole file: survey columns are sparse and a
/// prefix sample can miss the only non-integer value.
pub fn read_table_csv(path: &Path) -> Result<DataFrame> {
    let parse = |e: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse)?
        .finish()
        .map_err(parse)
}

/// Write a table checkpoint.
///
/// The file appears under its final name only once fully written, so its
/// presence can be trusted as a completed stage.
pub fn write_table_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::write(parent, e))?;
    }
    let part = partial_path(path);
    let mut file = File::create(&part).map_err(|e| IngestError::write(&part, e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    drop(file);
    std::fs::rename(&part, path).map_err(|e| IngestError::write(path, e))
}

/// Column names of a CSV file without reading its body.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let headers = reader.headers().map_err(|e| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(headers
        .iter()
        .map(|header| header.trim().trim_matches('\u{feff}').to_string())
        .collect())
}
