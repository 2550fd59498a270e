//! Transport file to DataFrame, with the encoding fallback.

use std::path::Path;

use brfss_xpt::{TextEncoding, XptReaderOptions, read_xpt_with_options};
use polars::prelude::DataFrame;
use tracing::{info, warn};

use crate::error::{IngestError, Result};

/// Decode a survey transport file.
///
/// Character values are decoded as strict UTF-8 first; if any value is
/// invalid the whole file is read again as Latin-1. Failure of the second
/// pass is a [`IngestError::Decode`].
pub fn read_xpt_table(path: &Path) -> Result<DataFrame> {
    let decode = |source| IngestError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let (dataset, encoding) = match read_xpt_with_options(path, XptReaderOptions::default()) {
        Ok(dataset) => (dataset, TextEncoding::Utf8),
        Err(err) if err.is_encoding() => {
            warn!(path = %path.display(), error = %err, "UTF-8 decode failed, retrying with Latin-1");
            let options = XptReaderOptions::default().with_encoding(TextEncoding::Latin1);
            let dataset = read_xpt_with_options(path, options).map_err(decode)?;
            (dataset, TextEncoding::Latin1)
        }
        Err(err) => return Err(decode(err)),
    };

    info!(
        path = %path.display(),
        dataset = %dataset.name,
        rows = dataset.num_rows(),
        columns = dataset.num_columns(),
        encoding = %encoding,
        "transport file decoded"
    );
    dataset
        .into_dataframe()
        .map_err(|e| IngestError::DataFrame {
            message: e.to_string(),
        })
}
