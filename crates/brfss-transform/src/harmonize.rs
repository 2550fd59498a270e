//! Projection of a raw year onto the canonical schema.

use std::collections::HashSet;

use brfss_model::{DiagnosticEvent, YearDiagnostics};
use brfss_standards::SchemaRegistry;
use polars::prelude::DataFrame;

use crate::error::TransformError;
use crate::frame::{column_names, float_column, float_values};

/// Project, rename, synthesize and unit-correct.
///
/// The output has exactly the registry's canonical columns, in declaration
/// order. For each canonical column the first declared alias present in the
/// table is used; further present aliases are ignored and reported as an
/// alias collision. Columns with no alias present are synthesized as fully
/// absent. Unit corrections apply after renaming, keyed by canonical name.
///
/// The target column is expected under its canonical name, as produced by
/// [`encode_target`](crate::encode_target).
pub fn harmonize(
    table: &DataFrame,
    registry: &SchemaRegistry,
    diag: &mut YearDiagnostics,
) -> Result<DataFrame, TransformError> {
    let names = column_names(table);
    let present: HashSet<&str> = names.iter().map(String::as_str).collect();
    let height = table.height();

    let mut columns = Vec::with_capacity(registry.entries().len());
    for entry in registry.entries() {
        let canonical = entry.canonical_name.as_str();
        let source = if entry.is_target() {
            present.contains(canonical).then_some(canonical)
        } else {
            let found: Vec<&str> = entry
                .aliases
                .iter()
                .map(String::as_str)
                .filter(|alias| present.contains(alias))
                .collect();
            if let [used, ignored @ ..] = found.as_slice()
                && !ignored.is_empty()
            {
                diag.record(DiagnosticEvent::AliasCollision {
                    canonical: canonical.to_string(),
                    used: (*used).to_string(),
                    ignored: ignored.iter().map(|alias| (*alias).to_string()).collect(),
                });
            }
            found.first().copied()
        };

        let values = match source {
            Some(raw) => {
                let values = float_values(table, raw)?;
                match entry.divide_by {
                    Some(divisor) => {
                        diag.record(DiagnosticEvent::UnitCorrected {
                            canonical: canonical.to_string(),
                            divisor,
                        });
                        values
                            .into_iter()
                            .map(|value| value.map(|v| v / divisor))
                            .collect()
                    }
                    None => values,
                }
            }
            None => {
                diag.record(DiagnosticEvent::ColumnSynthesized {
                    canonical: canonical.to_string(),
                });
                vec![None; height]
            }
        };
        columns.push(float_column(canonical, values));
    }

    Ok(DataFrame::new(columns)?)
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
                SchemaEntry::new("HighBP", ColumnKind::Categorical)
                    .with_aliases(["BPHIGH4", "BPHIGH6"]),
                SchemaEntry::new("BMI", ColumnKind::Numeric)
                    .with_aliases(["_BMI5"])
                    .with_divisor(100.0),
                SchemaEntry::new("Fruits", ColumnKind::Categorical).with_aliases(["_FRTLT1"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_projects_renames_and_synthesizes() {
        let df = df!(
            "_STATE" => [Some(1.0), Some(2.0)],
            "_BMI5" => [Some(2856.0), None],
            "BPHIGH6" => [Some(1.0), Some(3.0)],
            "Diabetes_binary" => [Some(1.0), Some(0.0)],
        )
        .unwrap();
        let mut diag = YearDiagnostics::new(2020);
        let out = harmonize(&df, &registry(), &mut diag).unwrap();

        assert_eq!(
            column_names(&out),
            vec!["Diabetes_binary", "HighBP", "BMI", "Fruits"]
        );
        assert_eq!(
            float_values(&out, "BMI").unwrap(),
            vec![Some(28.56), None]
        );
        assert_eq!(out.column("Fruits").unwrap().null_count(), 2);
        assert!(diag.events().contains(&DiagnosticEvent::ColumnSynthesized {
            canonical: "Fruits".to_string()
        }));
    }

    #[test]
    fn test_first_declared_alias_wins() {
        let df = df!(
            "BPHIGH6" => [Some(3.0)],
            "BPHIGH4" => [Some(1.0)],
            "DIABETE4" => [Some(1.0)],
        )
        .unwrap();
        let mut diag = YearDiagnostics::new(2020);
        let out = harmonize(&df, &registry(), &mut diag).unwrap();

        assert_eq!(float_values(&out, "HighBP").unwrap(), vec![Some(1.0)]);
        assert!(diag.events().contains(&DiagnosticEvent::AliasCollision {
            canonical: "HighBP".to_string(),
            used: "BPHIGH4".to_string(),
            ignored: vec!["BPHIGH6".to_string()],
        }));
        assert_eq!(diag.warning_count(), 1);
    }
}
