//! Sentinel normalization on raw columns.

use brfss_model::{DiagnosticEvent, SentinelSet, YearDiagnostics};
use brfss_standards::SchemaRegistry;
use polars::prelude::DataFrame;

use crate::error::TransformError;
use crate::frame::{column_names, float_column, float_values};

/// Replace sentinel codes with absence in every registry-known raw column.
///
/// Runs on raw names, before renaming: the code width is a property of the
/// raw field. Target aliases are left alone; their codes are resolved by the
/// target mapping instead. Unknown columns pass through untouched.
pub fn normalize_sentinels(
    table: &DataFrame,
    registry: &SchemaRegistry,
    diag: &mut YearDiagnostics,
) -> Result<DataFrame, TransformError> {
    let mut out = table.clone();
    for name in column_names(table) {
        let Some(entry) = registry.entry_for_raw(&name) else {
            continue;
        };
        if entry.is_target() {
            continue;
        }

        let sentinels = SentinelSet::for_widths(&entry.sentinel_widths);
        let mut count = 0usize;
        let values: Vec<Option<f64>> = float_values(table, &name)?
            .into_iter()
            .map(|value| match value {
                Some(v) if sentinels.contains(v) => {
                    count += 1;
                    None
                }
                other => other,
            })
            .collect();
        out.with_column(float_column(&name, values))?;

        if count > 0 {
            diag.record(DiagnosticEvent::SentinelsReplaced {
                raw_column: name,
                count,
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brfss_model::{ColumnKind, SchemaEntry};
    use polars::prelude::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new(
            "test",
            None,
            vec![
                SchemaEntry::new("Diabetes_binary", ColumnKind::Target)
                    .with_target_alias("DIABETE4", None, None),
                SchemaEntry::new("GenHlth", ColumnKind::Categorical).with_aliases(["GENHLTH"]),
                SchemaEntry::new("Age", ColumnKind::Categorical)
                    .with_aliases(["_AGEG5YR"])
                    .with_sentinel_widths(&[2]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_codes_follow_entry_widths() {
        let df = df!(
            "GENHLTH" => [Some(1.0), Some(7.0), Some(9.0), Some(77.0)],
            "_AGEG5YR" => [Some(7.0), Some(9.0), Some(99.0), Some(13.0)],
            "DIABETE4" => [Some(7.0), Some(9.0), Some(1.0), Some(3.0)],
            "SEQNO" => [Some(7.0), Some(8.0), Some(9.0), Some(10.0)],
        )
        .unwrap();
        let mut diag = YearDiagnostics::new(2020);
        let out = normalize_sentinels(&df, &registry(), &mut diag).unwrap();

        assert_eq!(
            float_values(&out, "GENHLTH").unwrap(),
            vec![Some(1.0), None, None, None]
        );
        assert_eq!(
            float_values(&out, "_AGEG5YR").unwrap(),
            vec![Some(7.0), Some(9.0), None, Some(13.0)]
        );
        assert_eq!(out.column("DIABETE4").unwrap().null_count(), 0);
        assert_eq!(out.column("SEQNO").unwrap().null_count(), 0);
        assert!(diag.events().contains(&DiagnosticEvent::SentinelsReplaced {
            raw_column: "GENHLTH".to_string(),
            count: 3,
        }));
    }
}
