use std::io::Write;

use brfss_model::{BinaryRule, ColumnKind};
use brfss_standards::{Generation, RegistryError, SchemaRegistry};

#[test]
fn builtin_generations_load() {
    for generation in Generation::ALL {
        let registry = SchemaRegistry::builtin(generation).expect("builtin registry");
        assert_eq!(registry.name(), generation.as_str());
        assert_eq!(registry.entries().len(), 22);
        assert_eq!(registry.target().canonical_name, "Diabetes_binary");
    }
}

#[test]
fn shared_raw_fields_use_the_same_sentinel_widths() {
    let kaggle = SchemaRegistry::builtin(Generation::KaggleV1).expect("kaggle-v1");
    let cdc = SchemaRegistry::builtin(Generation::CdcV2).expect("cdc-v2");

    let mut shared = 0;
    for raw in kaggle.raw_names() {
        let (Some(first), Some(second)) = (kaggle.entry_for_raw(raw), cdc.entry_for_raw(raw))
        else {
            continue;
        };
        shared += 1;
        assert_eq!(
            first.sentinel_widths, second.sentinel_widths,
            "{raw} has different sentinel widths across generations"
        );
    }
    assert!(shared > 10);
}

#[test]
fn cdc_v2_column_order() {
    let registry = SchemaRegistry::builtin(Generation::CdcV2).expect("registry");
    let names: Vec<&str> = registry.canonical_names().collect();
    insta::assert_debug_snapshot!(names);
}

#[test]
fn cdc_v2_lookups() {
    let registry = SchemaRegistry::builtin(Generation::CdcV2).expect("registry");

    assert_eq!(registry.canonical_for("BPHIGH6"), Some("HighBP"));
    assert_eq!(registry.canonical_for("_HLTHPL1"), Some("AnyHealthcare"));
    assert_eq!(registry.canonical_for("_STATE"), None);
    assert_eq!(registry.kind_of("BMI"), Some(ColumnKind::Numeric));
    assert_eq!(
        registry.entry("BMI").and_then(|entry| entry.divide_by),
        Some(100.0)
    );
    assert_eq!(registry.target_candidates(2017), vec!["DIABETE3"]);
    assert_eq!(registry.target_candidates(2021), vec!["DIABETE4"]);

    let binary = registry.binary_columns();
    assert!(binary.contains(&("Sex", BinaryRule::Sex)));
    assert!(binary.contains(&("HighBP", BinaryRule::Positive)));
    assert!(!binary.iter().any(|(name, _)| *name == "GenHlth"));
}

#[test]
fn kaggle_v1_maps_both_cancer_renames() {
    let registry = SchemaRegistry::builtin(Generation::KaggleV1).expect("registry");
    assert_eq!(registry.canonical_for("CHCSCNC1"), Some("ChcScncr"));
    assert_eq!(registry.canonical_for("CHCOCNC1"), Some("ChcoCncr"));
}

#[test]
fn generation_parses_case_insensitively() {
    assert_eq!("CDC-V2".parse::<Generation>().ok(), Some(Generation::CdcV2));
    assert!(matches!(
        "v3".parse::<Generation>(),
        Err(RegistryError::UnknownGeneration { .. })
    ));
}

#[test]
fn loads_custom_registry_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"
[registry]
name = "custom"

[[columns]]
name = "Diabetes_binary"
kind = "target"
binary = "positive"
target_aliases = [{{ name = "DIABETE4" }}]

[[columns]]
name = "HighBP"
kind = "categorical"
aliases = ["BPHIGH6", "BPHIGH7"]
binary = "positive"
"#
    )
    .expect("write registry");

    let registry = SchemaRegistry::from_path(file.path()).expect("custom registry");
    assert_eq!(registry.name(), "custom");
    assert_eq!(registry.description(), None);
    assert_eq!(registry.canonical_for("BPHIGH7"), Some("HighBP"));
    assert_eq!(registry.target_candidates(1999), vec!["DIABETE4"]);
}

#[test]
fn missing_registry_file_is_io_error() {
    let err = SchemaRegistry::from_path(std::path::Path::new("/nonexistent/registry.toml"))
        .unwrap_err();
    assert!(matches!(err, RegistryError::Io { .. }));
}
