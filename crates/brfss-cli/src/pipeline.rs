//! Year orchestration.
//!
//! Years run strictly in order. Each year moves through these stages, and
//! each stage leaves a checkpoint addressed by the year:
//!
//! 1. **Checkpoint**: a cleaned table on disk ends the year immediately
//! 2. **Load**: raw table CSV, else extracted transport file, else download
//! 3. **Clean**: sentinels, target, harmonize, impute, finalize
//! 4. **Write**: carried statistics sidecar, then the cleaned table
//!
//! The carried statistics of a finished year seed the next one. A skipped or
//! failed year passes the statistics it received through unchanged.

use brfss_ingest::{
    ArchiveSource, DataLayout, FetchError, IngestError, ensure_archive, extract_xpt,
    load_carried_stats, read_table_csv, read_xpt_table, save_carried_stats, write_table_csv,
};
use brfss_model::{CarriedStats, YearDiagnostics};
use brfss_standards::SchemaRegistry;
use brfss_transform::clean_year;
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use crate::config::{GapPolicy, PipelineConfig};
use crate::types::{RunResult, SkipReason, YearError, YearOutcome, YearReport};

/// Process every configured year.
///
/// Only failure to create the data directories aborts the run; everything
/// else is reported per year.
pub fn run_years(
    config: &PipelineConfig,
    source: &dyn ArchiveSource,
    registry: &SchemaRegistry,
) -> Result<RunResult, IngestError> {
    let layout = DataLayout::new(config.data_dir.clone());
    layout.ensure_dirs()?;
    let runner = YearRunner {
        layout: &layout,
        source,
        registry,
        gap_policy: config.gap_policy,
    };

    let mut result = RunResult::default();
    let mut carried = CarriedStats::new();
    for year in config.years() {
        let span = info_span!("year", year);
        let _guard = span.enter();

        let mut diagnostics = YearDiagnostics::new(year);
        let (outcome, next) = match runner.process(year, &carried, &mut diagnostics) {
            Ok(step) => step,
            Err(error) => {
                warn!(error = %error, "year failed");
                (YearOutcome::Failed { error }, None)
            }
        };
        match next {
            Some(next) => carried = next,
            None => debug!(carried = carried.len(), "carried statistics passed through"),
        }
        info!(outcome = outcome.label(), "year finished");
        result.years.push(YearReport {
            year,
            outcome,
            diagnostics,
        });
    }
    Ok(result)
}

enum Loaded {
    Table(DataFrame),
    Skipped(SkipReason),
}

struct YearRunner<'a> {
    layout: &'a DataLayout,
    source: &'a dyn ArchiveSource,
    registry: &'a SchemaRegistry,
    gap_policy: GapPolicy,
}

impl YearRunner<'_> {
    /// Outcome of `year` and the statistics it hands on; `None` passes the
    /// incoming statistics through.
    fn process(
        &self,
        year: i32,
        carried: &CarriedStats,
        diagnostics: &mut YearDiagnostics,
    ) -> Result<(YearOutcome, Option<CarriedStats>), YearError> {
        let cleaned_path = self.layout.cleaned_path(year);
        if cleaned_path.exists() {
            info!(path = %cleaned_path.display(), "cleaned table exists, skipping year");
            let stored = load_carried_stats(&self.layout.carried_stats_path(year))?;
            if stored.is_none() {
                warn!("no carried statistics stored with the checkpoint");
            }
            let outcome = YearOutcome::Done {
                checkpoint: true,
                rows: None,
                imputations: 0,
                gaps: Vec::new(),
            };
            return Ok((outcome, stored));
        }

        let raw = match self.load(year)? {
            Loaded::Table(raw) => raw,
            Loaded::Skipped(reason) => {
                match &reason {
                    SkipReason::NotFound { url } => info!(url = %url, "archive not published"),
                    SkipReason::Transport { url, message } => {
                        warn!(url = %url, error = %message, "download failed");
                    }
                }
                return Ok((YearOutcome::Skipped { reason }, None));
            }
        };

        let cleaned = clean_year(&raw, self.registry, year, carried, diagnostics)?;
        if cleaned.has_gaps() && self.gap_policy == GapPolicy::Fail {
            return Err(YearError::Gaps {
                columns: cleaned.gaps.iter().map(|gap| gap.column.clone()).collect(),
            });
        }

        let mut table = cleaned.table;
        save_carried_stats(&self.layout.carried_stats_path(year), &cleaned.carried)?;
        write_table_csv(&mut table, &cleaned_path)?;
        info!(
            rows = table.height(),
            path = %cleaned_path.display(),
            "cleaned table written"
        );

        let outcome = YearOutcome::Done {
            checkpoint: false,
            rows: Some(table.height()),
            imputations: diagnostics.imputations().count(),
            gaps: cleaned.gaps,
        };
        Ok((outcome, Some(cleaned.carried)))
    }

    fn load(&self, year: i32) -> Result<Loaded, YearError> {
        let raw_path = self.layout.raw_table_path(year);
        if raw_path.exists() {
            debug!(path = %raw_path.display(), "reading raw table checkpoint");
            return Ok(Loaded::Table(read_table_csv(&raw_path)?));
        }

        let xpt_path = self.layout.xpt_path(year);
        if !xpt_path.exists() {
            let archive = self.layout.archive_path(year);
            match ensure_archive(self.source, year, &archive) {
                Ok(_) => {}
                Err(FetchError::NotFound { url }) => {
                    return Ok(Loaded::Skipped(SkipReason::NotFound { url }));
                }
                Err(FetchError::Transport { url, message }) => {
                    return Ok(Loaded::Skipped(SkipReason::Transport { url, message }));
                }
                Err(err) => return Err(err.into()),
            }
            extract_xpt(&archive, &xpt_path)?;
        }

        let mut table = read_xpt_table(&xpt_path)?;
        write_table_csv(&mut table, &raw_path)?;
        info!(
            rows = table.height(),
            columns = table.width(),
            path = %raw_path.display(),
            "raw table written"
        );
        Ok(Loaded::Table(table))
    }
}
