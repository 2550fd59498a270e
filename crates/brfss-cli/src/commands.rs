use anyhow::{Context, Result};
use tracing::{info, info_span};

use brfss_cli::config::{ConfigOverrides, GapPolicy, PipelineConfig};
use brfss_cli::inspect::{InspectResult, inspect_years};
use brfss_cli::pipeline::run_years;
use brfss_cli::types::RunResult;
use brfss_ingest::HttpArchiveSource;
use brfss_map::{ColumnMatcher, write_report};

use crate::cli::{InspectArgs, PipelineArgs, RegistryArgs, RunArgs, SchemaArgs};
use crate::summary::{print_matches, print_registry};

const DEFAULT_REPORT_NAME: &str = "column_matches.csv";

pub fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    let mut overrides = pipeline_overrides(&args.pipeline);
    overrides.base_url = args.base_url.clone();
    if args.fail_on_gap {
        overrides.gap_policy = Some(GapPolicy::Fail);
    }
    let config = PipelineConfig::resolve(args.pipeline.config.as_deref(), overrides)
        .context("load configuration")?;
    let registry = config.load_registry().context("load column registry")?;

    let span = info_span!(
        "run",
        registry = registry.name(),
        from = config.start_year,
        to = config.end_year
    );
    let _guard = span.enter();
    info!(data_dir = %config.data_dir.display(), "starting pipeline");

    let source = HttpArchiveSource::new(config.base_url.clone(), config.request_timeout())
        .context("build HTTP client")?;
    run_years(&config, &source, &registry).context("prepare data directory")
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectResult> {
    let config = PipelineConfig::resolve(
        args.pipeline.config.as_deref(),
        pipeline_overrides(&args.pipeline),
    )
    .context("load configuration")?;
    let registry = config.load_registry().context("load column registry")?;
    let matcher = ColumnMatcher::new(args.cutoff);

    let result = inspect_years(&config, &registry, &matcher).context("read raw tables")?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.data_dir.join(DEFAULT_REPORT_NAME));
    write_report(&output, &result.matches)?;

    print_matches(&result.matches);
    if !result.missing_years.is_empty() {
        let years: Vec<String> = result.missing_years.iter().map(i32::to_string).collect();
        println!("No raw table for: {}", years.join(", "));
    }
    println!("Suggestions: {}", output.display());
    Ok(result)
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let overrides = registry_overrides(&args.registry);
    let config = PipelineConfig::resolve(args.config.as_deref(), overrides)
        .context("load configuration")?;
    let registry = config.load_registry().context("load column registry")?;
    print_registry(&registry);
    Ok(())
}

fn pipeline_overrides(args: &PipelineArgs) -> ConfigOverrides {
    ConfigOverrides {
        data_dir: args.data_dir.clone(),
        start_year: args.from,
        end_year: args.to,
        ..registry_overrides(&args.registry)
    }
}

fn registry_overrides(args: &RegistryArgs) -> ConfigOverrides {
    ConfigOverrides {
        generation: args.generation.map(Into::into),
        registry: args.registry.clone(),
        ..ConfigOverrides::default()
    }
}
