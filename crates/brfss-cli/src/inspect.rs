//! Alias inspection across the configured years.

use brfss_ingest::{DataLayout, IngestError, read_csv_headers};
use brfss_map::{AliasMatch, ColumnMatcher, inspect_year};
use brfss_standards::SchemaRegistry;
use tracing::warn;

use crate::config::PipelineConfig;

#[derive(Debug, Default)]
pub struct InspectResult {
    pub matches: Vec<AliasMatch>,
    /// Years without a raw table checkpoint.
    pub missing_years: Vec<i32>,
}

/// Match registry aliases against every year's raw table header.
pub fn inspect_years(
    config: &PipelineConfig,
    registry: &SchemaRegistry,
    matcher: &ColumnMatcher,
) -> Result<InspectResult, IngestError> {
    let layout = DataLayout::new(config.data_dir.clone());
    let mut result = InspectResult::default();
    for year in config.years() {
        let path = layout.raw_table_path(year);
        if !path.exists() {
            warn!(year, path = %path.display(), "raw table not found, skipping year");
            result.missing_years.push(year);
            continue;
        }
        let columns = read_csv_headers(&path)?;
        result
            .matches
            .extend(inspect_year(registry, matcher, year, &columns));
    }
    Ok(result)
}
