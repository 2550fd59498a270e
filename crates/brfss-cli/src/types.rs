use brfss_ingest::{FetchError, IngestError};
use brfss_model::{ImputationGap, YearDiagnostics};
use brfss_transform::TransformError;
use thiserror::Error;

/// Unrecoverable failure of one year. Never aborts the run.
#[derive(Debug, Error)]
pub enum YearError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("unresolved imputation gaps in {}", columns.join(", "))]
    Gaps { columns: Vec<String> },
}

/// Why a year was skipped without output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The archive is not published.
    NotFound { url: String },
    /// The archive could not be downloaded.
    Transport { url: String, message: String },
}

#[derive(Debug)]
pub enum YearOutcome {
    Done {
        /// Output already existed and was not recomputed.
        checkpoint: bool,
        /// Row count, unknown for checkpointed years.
        rows: Option<usize>,
        imputations: usize,
        gaps: Vec<ImputationGap>,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        error: YearError,
    },
}

impl YearOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Done {
                checkpoint: true, ..
            } => "checkpoint",
            Self::Done { gaps, .. } if !gaps.is_empty() => "flagged",
            Self::Done { .. } => "done",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

#[derive(Debug)]
pub struct YearReport {
    pub year: i32,
    pub outcome: YearOutcome,
    pub diagnostics: YearDiagnostics,
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub years: Vec<YearReport>,
}

impl RunResult {
    /// Some year failed, or finished with unresolved gaps.
    pub fn has_errors(&self) -> bool {
        self.years.iter().any(|report| match &report.outcome {
            YearOutcome::Failed { .. } => true,
            YearOutcome::Done { gaps, .. } => !gaps.is_empty(),
            YearOutcome::Skipped { .. } => false,
        })
    }

    /// Years with a cleaned table on disk, fresh or checkpointed.
    pub fn done_count(&self) -> usize {
        self.years
            .iter()
            .filter(|report| report.outcome.is_done())
            .count()
    }

    pub fn outcome(&self, year: i32) -> Option<&YearOutcome> {
        self.years
            .iter()
            .find(|report| report.year == year)
            .map(|report| &report.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brfss_model::ColumnKind;

    fn report(year: i32, outcome: YearOutcome) -> YearReport {
        YearReport {
            year,
            outcome,
            diagnostics: YearDiagnostics::new(year),
        }
    }

    fn done(gaps: Vec<ImputationGap>) -> YearOutcome {
        YearOutcome::Done {
            checkpoint: false,
            rows: Some(10),
            imputations: 2,
            gaps,
        }
    }

    #[test]
    fn test_skipped_years_are_not_errors() {
        let result = RunResult {
            years: vec![
                report(2019, done(Vec::new())),
                report(
                    2020,
                    YearOutcome::Skipped {
                        reason: SkipReason::NotFound {
                            url: "https://example.test/2020".to_string(),
                        },
                    },
                ),
            ],
        };
        assert!(!result.has_errors());
        assert_eq!(result.done_count(), 1);
        assert_eq!(result.outcome(2020).map(YearOutcome::label), Some("skipped"));
    }

    #[test]
    fn test_flagged_and_failed_years_are_errors() {
        let gap = ImputationGap {
            column: "HighBP".to_string(),
            kind: ColumnKind::Categorical,
            missing: 10,
        };
        let flagged = RunResult {
            years: vec![report(2019, done(vec![gap]))],
        };
        assert!(flagged.has_errors());
        assert_eq!(flagged.done_count(), 1);
        assert_eq!(flagged.outcome(2019).map(YearOutcome::label), Some("flagged"));

        let failed = RunResult {
            years: vec![report(
                2019,
                YearOutcome::Failed {
                    error: YearError::Gaps {
                        columns: vec!["HighBP".to_string()],
                    },
                },
            )],
        };
        assert!(failed.has_errors());
        assert_eq!(failed.done_count(), 0);
    }
}
