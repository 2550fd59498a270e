//! Collapse of nominally binary columns to strict {0,1}.

use brfss_model::{BinaryRule, DiagnosticEvent, SentinelSet, YearDiagnostics};
use brfss_standards::SchemaRegistry;
use polars::prelude::{Column, DataFrame};

use crate::error::TransformError;
use crate::frame::float_values;

/// Force every declared binary column into `Int64` values of 0 or 1.
///
/// Residual sentinel codes are cleared first. Under [`BinaryRule::Sex`] only
/// code 1 maps to 1; under [`BinaryRule::Positive`] any present positive value
/// maps to 1. Everything else, absence included, becomes 0. The collapse is
/// lossy for columns with more than two source codes.
pub fn finalize_binary(
    table: &DataFrame,
    registry: &SchemaRegistry,
    diag: &mut YearDiagnostics,
) -> Result<DataFrame, TransformError> {
    let sentinels = SentinelSet::full();
    let mut out = table.clone();

    for (name, rule) in registry.binary_columns() {
        if table.column(name).is_err() {
            continue;
        }
        let mut zeroed = 0usize;
        let collapsed: Vec<i64> = float_values(table, name)?
            .into_iter()
            .map(|value| {
                let value = value.filter(|v| !sentinels.contains(*v));
                let bit = collapse(rule, value);
                if bit == 0 && value.is_none_or(|v| v != 0.0) {
                    zeroed += 1;
                }
                bit
            })
            .collect();
        out.with_column(Column::new(name.into(), collapsed))?;

        diag.record(DiagnosticEvent::BinaryCollapsed {
            column: name.to_string(),
            zeroed,
        });
    }
    Ok(out)
}

fn collapse(rule: BinaryRule, value: Option<f64>) -> i64 {
    match (rule, value) {
        (BinaryRule::Sex, Some(v)) if v == 1.0 => 1,
        (BinaryRule::Positive, Some(v)) if v > 0.0 => 1,
        _ => 0,
    }
}
