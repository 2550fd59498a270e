//! Per-year diagnostic trail.
//!
//! Every engine step receives a `&mut YearDiagnostics` for the year being
//! processed and records what it did. Each record is also emitted as a
//! `tracing` event, so the trail doubles as the run log. The sink is owned by
//! the caller; nothing here is process-global.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::schema::ColumnKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// Where an imputed value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationSource {
    /// Rounded mean of this year's present values.
    Mean,
    /// Most frequent value of this year's present values.
    CurrentMode,
    /// Most frequent value carried from the previous year.
    CarriedMode,
}

impl ImputationSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::CurrentMode => "mode",
            Self::CarriedMode => "carried mode",
        }
    }
}

/// One column filled by the imputer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationRecord {
    pub column: String,
    pub kind: ColumnKind,
    pub source: ImputationSource,
    pub value: f64,
    pub filled: usize,
}

/// A column left with absent values because nothing was available to fill it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationGap {
    pub column: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    SentinelsReplaced {
        raw_column: String,
        count: usize,
    },
    TargetEncoded {
        raw_column: String,
        positive: usize,
        negative: usize,
        unmapped: usize,
    },
    AliasCollision {
        canonical: String,
        used: String,
        ignored: Vec<String>,
    },
    ColumnSynthesized {
        canonical: String,
    },
    UnitCorrected {
        canonical: String,
        divisor: f64,
    },
    Imputed(ImputationRecord),
    Gap(ImputationGap),
    BinaryCollapsed {
        column: String,
        zeroed: usize,
    },
}

impl DiagnosticEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::AliasCollision { .. } | Self::Gap(_) => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// Diagnostic sink scoped to one survey year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearDiagnostics {
    year: i32,
    events: Vec<DiagnosticEvent>,
}

impl YearDiagnostics {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            events: Vec::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn record(&mut self, event: DiagnosticEvent) {
        emit(self.year, &event);
        self.events.push(event);
    }

    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    pub fn imputations(&self) -> impl Iterator<Item = &ImputationRecord> {
        self.events.iter().filter_map(|event| match event {
            DiagnosticEvent::Imputed(record) => Some(record),
            _ => None,
        })
    }

    pub fn gaps(&self) -> impl Iterator<Item = &ImputationGap> {
        self.events.iter().filter_map(|event| match event {
            DiagnosticEvent::Gap(gap) => Some(gap),
            _ => None,
        })
    }

    pub fn warning_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| event.severity() == Severity::Warning)
            .count()
    }
}

fn emit(year: i32, event: &DiagnosticEvent) {
    match event {
        DiagnosticEvent::SentinelsReplaced { raw_column, count } => {
            debug!(year, column = %raw_column, count, "sentinel codes set to missing");
        }
        DiagnosticEvent::TargetEncoded {
            raw_column,
            positive,
            negative,
            unmapped,
        } => {
            info!(year, column = %raw_column, positive, negative, unmapped, "target encoded");
        }
        DiagnosticEvent::AliasCollision {
            canonical,
            used,
            ignored,
        } => {
            warn!(
                year,
                column = %canonical,
                used = %used,
                ignored = ?ignored,
                "several raw aliases present, using the first declared"
            );
        }
        DiagnosticEvent::ColumnSynthesized { canonical } => {
            info!(year, column = %canonical, "column absent this year, synthesized as missing");
        }
        DiagnosticEvent::UnitCorrected { canonical, divisor } => {
            info!(year, column = %canonical, divisor, "unit correction applied");
        }
        DiagnosticEvent::Imputed(record) => {
            info!(
                year,
                column = %record.column,
                kind = %record.kind,
                source = record.source.as_str(),
                value = record.value,
                filled = record.filled,
                "imputed missing values"
            );
        }
        DiagnosticEvent::Gap(gap) => {
            warn!(
                year,
                column = %gap.column,
                kind = %gap.kind,
                missing = gap.missing,
                "no value available to impute, missing values remain"
            );
        }
        DiagnosticEvent::BinaryCollapsed { column, zeroed } => {
            debug!(year, column = %column, zeroed, "binary column collapsed");
        }
    }
}
