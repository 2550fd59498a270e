//! Per-year inspection of where each registry alias went.

use std::path::Path;

use brfss_standards::SchemaRegistry;
use serde::Serialize;
use tracing::debug;

use crate::error::MapError;
use crate::score::ColumnMatcher;

/// One alias of one year and the raw column it most resembles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasMatch {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Alias")]
    pub alias: String,
    #[serde(rename = "Suggested")]
    pub suggested: Option<String>,
    #[serde(skip)]
    pub score: Option<f64>,
}

impl AliasMatch {
    /// The alias is present verbatim in the year's table.
    pub fn is_exact(&self) -> bool {
        self.suggested.as_deref() == Some(self.alias.as_str())
    }
}

/// Match every non-target registry alias against a year's raw columns.
///
/// Target aliases are selected by year window and are not matched here.
pub fn inspect_year<S: AsRef<str>>(
    registry: &SchemaRegistry,
    matcher: &ColumnMatcher,
    year: i32,
    columns: &[S],
) -> Vec<AliasMatch> {
    let matches: Vec<AliasMatch> = registry
        .raw_names()
        .filter(|alias| !registry.is_target_alias(alias))
        .map(|alias| {
            let candidate = matcher.best_match(alias, columns);
            AliasMatch {
                year,
                alias: alias.to_string(),
                score: candidate.as_ref().map(|c| c.score),
                suggested: candidate.map(|c| c.column),
            }
        })
        .collect();
    debug!(
        year,
        aliases = matches.len(),
        matched = matches.iter().filter(|m| m.suggested.is_some()).count(),
        "inspected raw columns"
    );
    matches
}

/// Write matches as `Year,Alias,Suggested`; unmatched aliases leave `Suggested` empty.
pub fn write_report(path: &Path, matches: &[AliasMatch]) -> Result<(), MapError> {
    let to_error = |source| MapError::Report {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(to_error)?;
    for row in matches {
        writer.serialize(row).map_err(to_error)?;
    }
    writer
        .flush()
        .map_err(|e| to_error(csv::Error::from(e)))?;
    Ok(())
}
