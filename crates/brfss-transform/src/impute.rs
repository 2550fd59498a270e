//! Imputation of remaining absence.
//!
//! Each column's fill value depends on that column's own values and its
//! carried statistic only, so columns may be visited in any order.

use brfss_model::{
    CarriedStats, ColumnKind, DiagnosticEvent, ImputationGap, ImputationRecord, ImputationSource,
    YearDiagnostics,
};
use brfss_standards::SchemaRegistry;
use polars::prelude::DataFrame;

use crate::error::TransformError;
use crate::frame::{column_names, float_column, float_values};

/// Result of imputing one year.
#[derive(Debug, Clone)]
pub struct Imputation {
    pub table: DataFrame,
    /// Most frequent value of every mode-imputed column, for the next year.
    pub carried: CarriedStats,
    /// Columns left with absent values.
    pub gaps: Vec<ImputationGap>,
}

/// Fill absent values column by column.
///
/// Numeric columns take the mean of their present values rounded to one
/// decimal. Categorical and target columns take their most frequent present
/// value, or the carried value when the year has none. A column with nothing
/// to fill from is left absent and returned as a gap. Columns the registry
/// does not know pass through.
pub fn impute(
    table: &DataFrame,
    registry: &SchemaRegistry,
    carried: &CarriedStats,
    diag: &mut YearDiagnostics,
) -> Result<Imputation, TransformError> {
    let mut out = table.clone();
    let mut next_carried = CarriedStats::new();
    let mut gaps = Vec::new();

    for name in column_names(table) {
        let Some(kind) = registry.kind_of(&name) else {
            continue;
        };
        let values = float_values(table, &name)?;
        let missing = values.iter().filter(|value| value.is_none()).count();

        let filled = if missing == 0 {
            values
        } else {
            match choose_fill(kind, &values, carried.get(&name)) {
                Some((value, source)) => {
                    diag.record(DiagnosticEvent::Imputed(ImputationRecord {
                        column: name.clone(),
                        kind,
                        source,
                        value,
                        filled: missing,
                    }));
                    values.into_iter().map(|v| v.or(Some(value))).collect()
                }
                None => {
                    let gap = ImputationGap {
                        column: name.clone(),
                        kind,
                        missing,
                    };
                    diag.record(DiagnosticEvent::Gap(gap.clone()));
                    gaps.push(gap);
                    values
                }
            }
        };

        if kind.uses_mode()
            && let Some(value) = mode(&filled)
        {
            next_carried.insert(name.clone(), value);
        }
        out.with_column(float_column(&name, filled))?;
    }

    Ok(Imputation {
        table: out,
        carried: next_carried,
        gaps,
    })
}

/// Fill value and its provenance, or `None` when there is nothing to fill from.
fn choose_fill(
    kind: ColumnKind,
    values: &[Option<f64>],
    carried: Option<f64>,
) -> Option<(f64, ImputationSource)> {
    match kind {
        ColumnKind::Numeric => rounded_mean(values).map(|v| (v, ImputationSource::Mean)),
        ColumnKind::Categorical | ColumnKind::Target => mode(values)
            .map(|v| (v, ImputationSource::CurrentMode))
            .or_else(|| carried.map(|v| (v, ImputationSource::CarriedMode))),
    }
}

/// Arithmetic mean of present values, rounded half away from zero to one decimal.
pub fn rounded_mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0f64, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Most frequent present value; ties resolve to the smallest value.
pub fn mode(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(f64::total_cmp);

    let mut best: Option<(f64, usize)> = None;
    for run in present.chunk_by(|a, b| a == b) {
        // Runs arrive in ascending order, so only a strictly longer run wins.
        if best.is_none_or(|(_, count)| run.len() > count) {
            best = Some((run[0], run.len()));
        }
    }
    best.map(|(value, _)| value)
}
