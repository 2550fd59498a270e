//! Data model for the BRFSS yearly harmonization pipeline.

pub mod diagnostics;
pub mod schema;
pub mod sentinel;
pub mod stats;
pub mod target;

pub use diagnostics::{
    DiagnosticEvent, ImputationGap, ImputationRecord, ImputationSource, Severity, YearDiagnostics,
};
pub use schema::{BinaryRule, ColumnKind, SchemaEntry, TargetAlias};
pub use sentinel::{ALL_WIDTHS, SentinelSet, codes_for_width};
pub use stats::CarriedStats;
pub use target::{TARGET_MAPPING, map_target_code};
