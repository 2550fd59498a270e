#![deny(unsafe_code)]

//! Schema registry: raw survey column names to canonical columns.
//!
//! A registry is pure data. Adding a year's renamed field means adding an
//! alias to the generation file; no engine code changes.

use std::collections::BTreeMap;
use std::path::Path;

use brfss_model::{ALL_WIDTHS, BinaryRule, ColumnKind, SchemaEntry};
use serde::Deserialize;

use crate::error::RegistryError;
use crate::generation::Generation;

#[derive(Debug, Deserialize)]
struct RegistryFile {
    registry: RegistryHeader,
    columns: Vec<SchemaEntry>,
}

#[derive(Debug, Deserialize)]
struct RegistryHeader {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

/// Validated set of schema entries for one generation.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    name: String,
    description: Option<String>,
    entries: Vec<SchemaEntry>,
    /// Raw name to index into `entries`.
    raw_index: BTreeMap<String, usize>,
    target: usize,
}

impl SchemaRegistry {
    /// Load a built-in generation.
    pub fn builtin(generation: Generation) -> Result<Self, RegistryError> {
        Self::from_toml_str(generation.source())
    }

    /// Load a registry generation from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(text)?;
        Self::new(file.registry.name, file.registry.description, file.columns)
    }

    /// Build a registry from entries, validating the alias invariants.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        entries: Vec<SchemaEntry>,
    ) -> Result<Self, RegistryError> {
        let mut canonical: BTreeMap<&str, usize> = BTreeMap::new();
        let mut raw_index: BTreeMap<String, usize> = BTreeMap::new();
        let mut targets = Vec::new();

        for (idx, entry) in entries.iter().enumerate() {
            let name = entry.canonical_name.as_str();
            if name.trim().is_empty() {
                return Err(RegistryError::invalid(name, "canonical name is empty"));
            }
            if canonical.insert(name, idx).is_some() {
                return Err(RegistryError::DuplicateCanonical {
                    name: name.to_string(),
                });
            }
            validate_entry(entry)?;
            if entry.is_target() {
                targets.push(idx);
            }
            for raw in entry.raw_names() {
                if let Some(&previous) = raw_index.get(raw) {
                    return Err(RegistryError::DuplicateAlias {
                        alias: raw.to_string(),
                        first: entries[previous].canonical_name.clone(),
                        second: name.to_string(),
                    });
                }
                raw_index.insert(raw.to_string(), idx);
            }
        }

        let target = match targets.as_slice() {
            [single] => *single,
            other => return Err(RegistryError::TargetCount { count: other.len() }),
        };

        Ok(Self {
            name: name.into(),
            description,
            entries,
            raw_index,
            target,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Canonical names in declaration order; this is the output column order.
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.canonical_name.as_str())
    }

    pub fn entry(&self, canonical: &str) -> Option<&SchemaEntry> {
        self.entries
            .iter()
            .find(|entry| entry.canonical_name == canonical)
    }

    pub fn entry_for_raw(&self, raw: &str) -> Option<&SchemaEntry> {
        self.raw_index.get(raw).map(|&idx| &self.entries[idx])
    }

    /// Canonical name for a raw column, `None` when the column is dropped.
    pub fn canonical_for(&self, raw: &str) -> Option<&str> {
        self.entry_for_raw(raw)
            .map(|entry| entry.canonical_name.as_str())
    }

    pub fn kind_of(&self, canonical: &str) -> Option<ColumnKind> {
        self.entry(canonical).map(|entry| entry.kind)
    }

    pub fn target(&self) -> &SchemaEntry {
        &self.entries[self.target]
    }

    pub fn is_target_alias(&self, raw: &str) -> bool {
        self.raw_index.get(raw) == Some(&self.target)
    }

    /// Raw target names whose year window covers `year`, in declaration order.
    pub fn target_candidates(&self, year: i32) -> Vec<&str> {
        self.target()
            .target_aliases
            .iter()
            .filter(|alias| alias.covers(year))
            .map(|alias| alias.name.as_str())
            .collect()
    }

    /// The raw target column to encode for `year`: the first in-window alias
    /// that is present in the table.
    pub fn target_alias_for_year<'a, I>(&self, year: i32, present: I) -> Option<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: Vec<&str> = present.into_iter().collect();
        self.target_candidates(year)
            .into_iter()
            .find(|candidate| present.contains(candidate))
    }

    /// Canonical columns forced into {0,1} by the finalizer.
    pub fn binary_columns(&self) -> Vec<(&str, BinaryRule)> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .binary
                    .map(|rule| (entry.canonical_name.as_str(), rule))
            })
            .collect()
    }

    /// Every known raw name, in declaration order.
    pub fn raw_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flat_map(SchemaEntry::raw_names)
    }
}

fn validate_entry(entry: &SchemaEntry) -> Result<(), RegistryError> {
    let name = entry.canonical_name.as_str();
    if entry.is_target() {
        if entry.target_aliases.is_empty() {
            return Err(RegistryError::invalid(name, "target has no target_aliases"));
        }
        if !entry.aliases.is_empty() {
            return Err(RegistryError::invalid(
                name,
                "target raw names belong in target_aliases",
            ));
        }
    } else {
        if entry.aliases.is_empty() {
            return Err(RegistryError::invalid(name, "no raw aliases declared"));
        }
        if !entry.target_aliases.is_empty() {
            return Err(RegistryError::invalid(
                name,
                "target_aliases are only valid on the target column",
            ));
        }
    }
    for alias in &entry.target_aliases {
        if let (Some(from), Some(to)) = (alias.from, alias.to)
            && from > to
        {
            return Err(RegistryError::invalid(
                name,
                format!("target alias {} has an empty year window", alias.name),
            ));
        }
    }
    if entry.raw_names().any(|raw| raw.trim().is_empty()) {
        return Err(RegistryError::invalid(name, "empty raw alias"));
    }
    if let Some(width) = entry
        .sentinel_widths
        .iter()
        .find(|width| !ALL_WIDTHS.contains(width))
    {
        return Err(RegistryError::invalid(
            name,
            format!("sentinel width {width} is not one of {ALL_WIDTHS:?}"),
        ));
    }
    if let Some(divisor) = entry.divide_by
        && (divisor == 0.0 || !divisor.is_finite())
    {
        return Err(RegistryError::invalid(
            name,
            format!("divide_by must be finite and non-zero, got {divisor}"),
        ));
    }
    Ok(())
}
