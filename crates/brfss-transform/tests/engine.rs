use brfss_model::{
    CarriedStats, ColumnKind, DiagnosticEvent, ImputationSource, YearDiagnostics,
};
use brfss_standards::{Generation, SchemaRegistry};
use brfss_transform::frame::{column_names, float_values};
use brfss_transform::{
    TransformError, clean_year, encode_target, finalize_binary, impute, normalize_sentinels,
};
use polars::prelude::*;
use proptest::prelude::*;

fn cdc() -> SchemaRegistry {
    SchemaRegistry::builtin(Generation::CdcV2).expect("cdc-v2 registry")
}

/// Synthetic raw year: first alias of every entry, the year's target alias,
/// and one unknown column.
fn raw_table(registry: &SchemaRegistry, year: i32, rows: usize) -> DataFrame {
    let mut columns = Vec::new();
    for entry in registry.entries() {
        let (raw, values): (&str, Vec<Option<f64>>) = if entry.is_target() {
            let codes = [1.0, 4.0, 2.0, 3.0, 9.0];
            (
                registry.target_candidates(year)[0],
                (0..rows).map(|i| Some(codes[i % codes.len()])).collect(),
            )
        } else {
            let values = match (entry.kind, entry.divide_by) {
                (ColumnKind::Numeric, Some(_)) => {
                    (0..rows).map(|i| Some(2500.0 + 10.0 * i as f64)).collect()
                }
                (ColumnKind::Numeric, None) => (0..rows)
                    .map(|i| Some(if i % 4 == 3 { 88.0 } else { (i % 30) as f64 }))
                    .collect(),
                _ => (0..rows)
                    .map(|i| match i % 3 {
                        0 => Some(1.0),
                        1 => Some(2.0),
                        _ => None,
                    })
                    .collect(),
            };
            (entry.aliases[0].as_str(), values)
        };
        columns.push(Column::new(raw.into(), values));
    }
    columns.push(Column::new("_STATE".into(), vec![Some(1.0); rows]));
    DataFrame::new(columns).expect("raw table")
}

fn total_nulls(df: &DataFrame) -> usize {
    df.get_columns().iter().map(Column::null_count).sum()
}

#[test]
fn every_canonical_column_present_under_each_generation() {
    for generation in Generation::ALL {
        let registry = SchemaRegistry::builtin(generation).expect("registry");
        for year in [2016, 2021] {
            let raw = raw_table(&registry, year, 10);
            let mut diag = YearDiagnostics::new(year);
            let cleaned = clean_year(&raw, &registry, year, &CarriedStats::new(), &mut diag)
                .expect("clean year");

            let expected: Vec<String> = registry.canonical_names().map(str::to_string).collect();
            assert_eq!(column_names(&cleaned.table), expected, "{generation} {year}");
            assert_eq!(cleaned.table.height(), 10);
            assert!(!cleaned.has_gaps());
            assert_eq!(total_nulls(&cleaned.table), 0);
        }
    }
}

#[test]
fn gaps_are_flagged_not_hidden() {
    let registry = cdc();
    let mut raw = raw_table(&registry, 2020, 6);
    raw.drop_in_place("MENTHLTH").expect("drop MENTHLTH");
    let mut diag = YearDiagnostics::new(2020);
    let cleaned = clean_year(&raw, &registry, 2020, &CarriedStats::new(), &mut diag)
        .expect("clean year");

    let gap_columns: Vec<&str> = cleaned.gaps.iter().map(|gap| gap.column.as_str()).collect();
    assert_eq!(gap_columns, vec!["MentHlth"]);
    assert_eq!(cleaned.table.column("MentHlth").unwrap().null_count(), 6);
    assert_eq!(total_nulls(&cleaned.table), 6);
    assert_eq!(diag.gaps().count(), 1);
}

#[test]
fn target_codes_binarize() {
    let registry = cdc();
    let mut raw = raw_table(&registry, 2016, 8);
    raw.with_column(Column::new(
        "DIABETE3".into(),
        [1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 9.0, 6.0].map(Some).to_vec(),
    ))
    .unwrap();

    let mut diag = YearDiagnostics::new(2016);
    let encoded = encode_target(&raw, &registry, 2016, &mut diag).unwrap();
    assert_eq!(
        float_values(&encoded, "Diabetes_binary").unwrap(),
        vec![
            Some(1.0),
            Some(1.0),
            Some(0.0),
            Some(0.0),
            Some(0.0),
            Some(0.0),
            Some(0.0),
            None
        ]
    );
    assert!(diag.events().contains(&DiagnosticEvent::TargetEncoded {
        raw_column: "DIABETE3".to_string(),
        positive: 2,
        negative: 5,
        unmapped: 1,
    }));

    // The unmapped code is resolved by the mode of the labeled rows.
    let mut diag = YearDiagnostics::new(2016);
    let cleaned = clean_year(&raw, &registry, 2016, &CarriedStats::new(), &mut diag).unwrap();
    assert_eq!(
        float_values(&cleaned.table, "Diabetes_binary").unwrap(),
        [1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0].map(Some).to_vec()
    );
}

#[test]
fn missing_target_column_is_a_schema_gap() {
    let registry = cdc();
    let mut raw = raw_table(&registry, 2020, 4);
    raw.drop_in_place("DIABETE4").unwrap();
    raw.with_column(Column::new("DIABETE3".into(), vec![Some(1.0); 4]))
        .unwrap();

    let mut diag = YearDiagnostics::new(2020);
    let err = clean_year(&raw, &registry, 2020, &CarriedStats::new(), &mut diag).unwrap_err();
    assert!(matches!(err, TransformError::SchemaGap { year: 2020, .. }));
}

#[test]
fn carried_mode_fills_an_empty_year() {
    let registry = cdc();

    let mut first = raw_table(&registry, 2017, 3);
    first
        .with_column(Column::new("EDUCA".into(), [6.0, 6.0, 5.0].map(Some).to_vec()))
        .unwrap();
    let mut diag = YearDiagnostics::new(2017);
    let year_one = clean_year(&first, &registry, 2017, &CarriedStats::new(), &mut diag).unwrap();
    assert_eq!(year_one.carried.get("Education"), Some(6.0));

    // Every respondent refused: only sentinel codes this year.
    let mut second = raw_table(&registry, 2018, 3);
    second
        .with_column(Column::new("EDUCA".into(), [9.0, 9.0, 9.0].map(Some).to_vec()))
        .unwrap();
    let mut diag = YearDiagnostics::new(2018);
    let year_two = clean_year(&second, &registry, 2018, &year_one.carried, &mut diag).unwrap();

    assert_eq!(
        float_values(&year_two.table, "Education").unwrap(),
        vec![Some(6.0); 3]
    );
    let record = diag
        .imputations()
        .find(|record| record.column == "Education")
        .expect("education imputation");
    assert_eq!(record.source, ImputationSource::CarriedMode);
    assert_eq!(record.value, 6.0);
    assert_eq!(record.filled, 3);
    assert_eq!(year_two.carried.get("Education"), Some(6.0));
}

#[test]
fn absent_high_bp_is_filled_end_to_end() {
    let registry = cdc();
    let mut raw = raw_table(&registry, 2019, 5);
    raw.drop_in_place("BPHIGH4").unwrap();

    let mut carried = CarriedStats::new();
    carried.insert("HighBP", 1.0);
    let mut diag = YearDiagnostics::new(2019);
    let cleaned = clean_year(&raw, &registry, 2019, &carried, &mut diag).unwrap();

    let high_bp = cleaned.table.column("HighBP").unwrap();
    assert_eq!(high_bp.null_count(), 0);
    assert_eq!(high_bp.dtype(), &DataType::Int64);
    assert_eq!(
        high_bp.i64().unwrap().into_iter().collect::<Vec<_>>(),
        vec![Some(1); 5]
    );
    assert!(!cleaned.has_gaps());

    // First year of a run: nothing to carry, the gap is flagged and the
    // binary column collapses to 0.
    let mut diag = YearDiagnostics::new(2019);
    let cleaned = clean_year(&raw, &registry, 2019, &CarriedStats::new(), &mut diag).unwrap();
    let high_bp = cleaned.table.column("HighBP").unwrap();
    assert_eq!(high_bp.null_count(), 0);
    assert_eq!(
        high_bp.i64().unwrap().into_iter().collect::<Vec<_>>(),
        vec![Some(0); 5]
    );
    assert_eq!(cleaned.gaps.len(), 1);
    assert_eq!(cleaned.gaps[0].column, "HighBP");
}

#[test]
fn mean_is_rounded_and_mode_ties_take_smallest() {
    let registry = cdc();
    let mut raw = raw_table(&registry, 2019, 5);
    raw.with_column(Column::new(
        "_BMI5".into(),
        vec![Some(2856.0), Some(2857.0), None, Some(2856.0), Some(2857.0)],
    ))
    .unwrap();
    raw.with_column(Column::new(
        "GENHLTH".into(),
        vec![Some(3.0), Some(2.0), None, Some(2.0), Some(3.0)],
    ))
    .unwrap();

    let mut diag = YearDiagnostics::new(2019);
    let cleaned = clean_year(&raw, &registry, 2019, &CarriedStats::new(), &mut diag).unwrap();

    assert_eq!(
        float_values(&cleaned.table, "BMI").unwrap()[2],
        Some(28.6)
    );
    assert_eq!(
        float_values(&cleaned.table, "GenHlth").unwrap()[2],
        Some(2.0)
    );
    assert_eq!(cleaned.carried.get("GenHlth"), Some(2.0));
    // Numeric columns are not carried.
    assert_eq!(cleaned.carried.get("BMI"), None);
}

#[test]
fn two_digit_sentinels_keep_single_digit_codes() {
    let registry = cdc();
    let raw = df!(
        "_AGEG5YR" => [7.0, 8.0, 9.0, 14.0, 77.0, 99.0],
        "GENHLTH" => [7.0, 1.0, 9.0, 2.0, 3.0, 8.0],
        "DIABETE4" => [7.0, 1.0, 9.0, 2.0, 3.0, 4.0],
    )
    .unwrap();

    let mut diag = YearDiagnostics::new(2020);
    let out = normalize_sentinels(&raw, &registry, &mut diag).unwrap();

    assert_eq!(
        float_values(&out, "_AGEG5YR").unwrap(),
        vec![Some(7.0), Some(8.0), Some(9.0), Some(14.0), None, None]
    );
    assert_eq!(
        float_values(&out, "GENHLTH").unwrap(),
        vec![None, Some(1.0), None, Some(2.0), Some(3.0), None]
    );
    // The raw target is resolved by the target mapping, not by sentinels.
    assert_eq!(out.column("DIABETE4").unwrap().null_count(), 0);
    // The caller's table is untouched.
    assert_eq!(raw.column("GENHLTH").unwrap().null_count(), 0);
}

#[test]
fn first_generation_keeps_single_digit_counts_and_brackets() {
    let registry = SchemaRegistry::builtin(Generation::KaggleV1).expect("kaggle-v1 registry");
    let raw = df!(
        "INCOME2" => [7.0, 8.0, 77.0, 99.0],
        "PHYSHLTH" => [9.0, 7.0, 88.0, 99.0],
        "MENTHLTH" => [8.0, 30.0, 77.0, 1.0],
        "POORHLTH" => [9.0, 88.0, 2.0, 7.0],
        "DIABETE3" => [1.0, 3.0, 4.0, 2.0],
    )
    .unwrap();

    let mut diag = YearDiagnostics::new(2017);
    let out = normalize_sentinels(&raw, &registry, &mut diag).unwrap();

    assert_eq!(
        float_values(&out, "INCOME2").unwrap(),
        vec![Some(7.0), Some(8.0), None, None]
    );
    assert_eq!(
        float_values(&out, "PHYSHLTH").unwrap(),
        vec![Some(9.0), Some(7.0), None, None]
    );
    assert_eq!(
        float_values(&out, "MENTHLTH").unwrap(),
        vec![Some(8.0), Some(30.0), None, Some(1.0)]
    );
    assert_eq!(
        float_values(&out, "POORHLTH").unwrap(),
        vec![Some(9.0), None, Some(2.0), Some(7.0)]
    );
}

#[test]
fn sex_collapse() {
    let registry = cdc();
    let table = df!(
        "Sex" => [Some(1.0), Some(2.0), Some(3.0), Some(7.0), Some(9.0), Some(77.0), Some(777777.0), None],
    )
    .unwrap();
    let mut diag = YearDiagnostics::new(2020);
    let out = finalize_binary(&table, &registry, &mut diag).unwrap();

    assert_eq!(
        out.column("Sex")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect::<Vec<_>>(),
        [1, 0, 0, 0, 0, 0, 0, 0].map(Some).to_vec()
    );
    assert!(diag.events().contains(&DiagnosticEvent::BinaryCollapsed {
        column: "Sex".to_string(),
        zeroed: 7,
    }));
}

fn survey_code() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(prop::sample::select(vec![
        -1.0, 0.0, 0.5, 1.0, 2.0, 3.0, 4.0, 7.0, 8.0, 9.0, 77.0, 99.0, 777.0, 9999.0, 777777.0,
    ]))
}

proptest! {
    #[test]
    fn binary_columns_are_zero_or_one(rows in prop::collection::vec((survey_code(), survey_code()), 1..40)) {
        let registry = cdc();
        let (sex, high_bp): (Vec<Option<f64>>, Vec<Option<f64>>) = rows.into_iter().unzip();
        let table = DataFrame::new(vec![
            Column::new("Sex".into(), sex),
            Column::new("HighBP".into(), high_bp),
        ])
        .unwrap();

        let mut diag = YearDiagnostics::new(2020);
        let out = finalize_binary(&table, &registry, &mut diag).unwrap();
        for name in ["Sex", "HighBP"] {
            let column = out.column(name).unwrap();
            prop_assert_eq!(column.null_count(), 0);
            for value in column.i64().unwrap().into_iter().flatten() {
                prop_assert!(value == 0 || value == 1, "{name} produced {value}");
            }
        }
    }

    #[test]
    fn raw_column_order_does_not_matter(
        order in Just(column_names(&raw_table(&cdc(), 2019, 9))).prop_shuffle()
    ) {
        let registry = cdc();
        let raw = raw_table(&registry, 2019, 9);
        let shuffled = raw.select(order).unwrap();

        let mut carried = CarriedStats::new();
        carried.insert("Income", 5.0);
        let mut diag = YearDiagnostics::new(2019);
        let expected = clean_year(&raw, &registry, 2019, &carried, &mut diag).unwrap();
        let mut diag = YearDiagnostics::new(2019);
        let actual = clean_year(&shuffled, &registry, 2019, &carried, &mut diag).unwrap();

        prop_assert!(expected.table.equals_missing(&actual.table));
        prop_assert_eq!(expected.carried, actual.carried);
    }

    #[test]
    fn imputed_column_order_does_not_matter(
        order in Just(cdc().canonical_names().map(str::to_string).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let registry = cdc();
        let mut diag = YearDiagnostics::new(2019);
        let raw = raw_table(&registry, 2019, 7);
        let table = encode_target(&normalize_sentinels(&raw, &registry, &mut diag).unwrap(), &registry, 2019, &mut diag).unwrap();
        let table = brfss_transform::harmonize(&table, &registry, &mut diag).unwrap();

        let in_order = impute(&table, &registry, &CarriedStats::new(), &mut diag).unwrap();
        let shuffled = impute(&table.select(order).unwrap(), &registry, &CarriedStats::new(), &mut diag).unwrap();

        let names = column_names(&in_order.table);
        prop_assert!(in_order.table.equals_missing(&shuffled.table.select(names).unwrap()));
        prop_assert_eq!(in_order.carried, shuffled.carried);
    }
}
