//! Pipeline configuration.
//!
//! Values come from an optional TOML file; command-line flags override them.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use brfss_ingest::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use brfss_standards::{Generation, RegistryError, SchemaRegistry};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First survey year the built-in registries cover.
pub const DEFAULT_START_YEAR: i32 = 2015;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("year range {start}..={end} is empty")]
    EmptyRange { start: i32, end: i32 },
}

/// What to do with a year whose output still has unresolved gaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// Write the output and flag the year.
    #[default]
    Flag,
    /// Fail the year and write nothing.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub base_url: String,
    pub start_year: i32,
    pub end_year: i32,
    pub generation: Generation,
    /// Custom registry file; takes precedence over `generation`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,
    pub gap_policy: GapPolicy,
    pub request_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            base_url: DEFAULT_BASE_URL.to_string(),
            start_year: DEFAULT_START_YEAR,
            end_year: chrono::Local::now().year(),
            generation: Generation::default(),
            registry: None,
            gap_policy: GapPolicy::default(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Command-line values that replace file values when given.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub generation: Option<Generation>,
    pub registry: Option<PathBuf>,
    pub gap_policy: Option<GapPolicy>,
}

impl PipelineConfig {
    /// File values (or defaults without a file), then overrides.
    pub fn resolve(file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let config = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        }
        .with_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(year) = overrides.start_year {
            self.start_year = year;
        }
        if let Some(year) = overrides.end_year {
            self.end_year = year;
        }
        if let Some(generation) = overrides.generation {
            self.generation = generation;
            // An explicit generation replaces a registry file from the config.
            self.registry = None;
        }
        if let Some(registry) = overrides.registry {
            self.registry = Some(registry);
        }
        if let Some(policy) = overrides.gap_policy {
            self.gap_policy = policy;
        }
        self
    }

    /// The custom registry file if one is set, else the built-in generation.
    pub fn load_registry(&self) -> Result<SchemaRegistry, RegistryError> {
        match &self.registry {
            Some(path) => SchemaRegistry::from_path(path),
            None => SchemaRegistry::builtin(self.generation),
        }
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_year > self.end_year {
            return Err(ConfigError::EmptyRange {
                start: self.start_year,
                end: self.end_year,
            });
        }
        Ok(())
    }
}
