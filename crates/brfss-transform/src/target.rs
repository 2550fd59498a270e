//! Target encoding.

use brfss_model::{DiagnosticEvent, YearDiagnostics, map_target_code};
use brfss_standards::SchemaRegistry;
use polars::prelude::DataFrame;

use crate::error::TransformError;
use crate::frame::{column_names, float_column, float_values};

/// Binarize the year's raw target column into the canonical target.
///
/// The raw column is the first alias whose year window covers `year` and
/// which is present in the table. Unmapped codes become absent and are left
/// for the imputer. Every raw target alias is dropped from the output.
pub fn encode_target(
    table: &DataFrame,
    registry: &SchemaRegistry,
    year: i32,
    diag: &mut YearDiagnostics,
) -> Result<DataFrame, TransformError> {
    let names = column_names(table);
    let raw = registry
        .target_alias_for_year(year, names.iter().map(String::as_str))
        .ok_or_else(|| TransformError::SchemaGap {
            year,
            candidates: registry
                .target_candidates(year)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })?
        .to_string();

    let (mut positive, mut negative, mut unmapped) = (0usize, 0usize, 0usize);
    let encoded: Vec<Option<f64>> = float_values(table, &raw)?
        .into_iter()
        .map(|value| {
            let mapped = value.and_then(map_target_code);
            match mapped {
                Some(v) if v > 0.0 => positive += 1,
                Some(_) => negative += 1,
                None => unmapped += 1,
            }
            mapped
        })
        .collect();

    let mut out = table.clone();
    for name in names.iter().filter(|name| registry.is_target_alias(name)) {
        out.drop_in_place(name)?;
    }
    out.with_column(float_column(&registry.target().canonical_name, encoded))?;

    diag.record(DiagnosticEvent::TargetEncoded {
        raw_column: raw,
        positive,
        negative,
        unmapped,
    });
    Ok(out)
}
