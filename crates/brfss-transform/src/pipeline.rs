//! One survey year through the whole engine.

use brfss_model::{CarriedStats, ImputationGap, YearDiagnostics};
use brfss_standards::SchemaRegistry;
use polars::prelude::DataFrame;
use tracing::debug;

use crate::binary::finalize_binary;
use crate::error::TransformError;
use crate::harmonize::harmonize;
use crate::impute::{Imputation, impute};
use crate::sentinel::normalize_sentinels;
use crate::target::encode_target;

/// A year's canonical table and what it hands to the next year.
#[derive(Debug, Clone)]
pub struct CleanedYear {
    pub table: DataFrame,
    pub carried: CarriedStats,
    pub gaps: Vec<ImputationGap>,
}

impl CleanedYear {
    pub fn has_gaps(&self) -> bool {
        !self.gaps.is_empty()
    }
}

/// Clean one raw year table.
///
/// Sentinels are cleared on raw names, the target is encoded from the
/// year's raw alias, the table is projected onto the canonical schema, then
/// imputed against `carried` and finalized. The raw table is not modified.
pub fn clean_year(
    raw: &DataFrame,
    registry: &SchemaRegistry,
    year: i32,
    carried: &CarriedStats,
    diag: &mut YearDiagnostics,
) -> Result<CleanedYear, TransformError> {
    debug!(year, rows = raw.height(), columns = raw.width(), "cleaning year");

    let table = normalize_sentinels(raw, registry, diag)?;
    let table = encode_target(&table, registry, year, diag)?;
    let table = harmonize(&table, registry, diag)?;
    let Imputation {
        table,
        carried,
        gaps,
    } = impute(&table, registry, carried, diag)?;
    let table = finalize_binary(&table, registry, diag)?;

    Ok(CleanedYear {
        table,
        carried,
        gaps,
    })
}
