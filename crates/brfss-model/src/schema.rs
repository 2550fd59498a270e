//! Schema entry types shared by the registry and the harmonization engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sentinel::ALL_WIDTHS;

/// How a canonical column is imputed and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Filled with the rounded arithmetic mean.
    Numeric,
    /// Filled with the most frequent value, carried across years.
    Categorical,
    /// The binarized diabetes label.
    Target,
}

impl ColumnKind {
    /// Kinds whose absence is resolved by the most frequent value.
    pub fn uses_mode(self) -> bool {
        matches!(self, Self::Categorical | Self::Target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapse rule applied by the binary finalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryRule {
    /// Any present positive value becomes 1, everything else 0.
    Positive,
    /// Code 1 becomes 1, code 2 becomes 0, everything else 0.
    Sex,
}

impl BinaryRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Sex => "sex",
        }
    }
}

impl fmt::Display for BinaryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw target column name and the survey years it is valid for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAlias {
    pub name: String,
    /// First year (inclusive) the alias is used.
    #[serde(default)]
    pub from: Option<i32>,
    /// Last year (inclusive) the alias is used.
    #[serde(default)]
    pub to: Option<i32>,
}

impl TargetAlias {
    pub fn covers(&self, year: i32) -> bool {
        self.from.is_none_or(|from| year >= from) && self.to.is_none_or(|to| year <= to)
    }
}

/// One canonical column and every raw name it has carried across survey years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    #[serde(rename = "name")]
    pub canonical_name: String,
    pub kind: ColumnKind,
    /// Raw names in precedence order.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Year-scoped raw names, only for the target column.
    #[serde(default)]
    pub target_aliases: Vec<TargetAlias>,
    #[serde(default)]
    pub binary: Option<BinaryRule>,
    /// Unit correction divisor applied after renaming.
    #[serde(default)]
    pub divide_by: Option<f64>,
    /// Digit widths of the sentinel codes that apply to this column's raw fields.
    #[serde(default = "default_sentinel_widths")]
    pub sentinel_widths: Vec<u8>,
}

fn default_sentinel_widths() -> Vec<u8> {
    ALL_WIDTHS.to_vec()
}

impl SchemaEntry {
    pub fn new(canonical_name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            kind,
            aliases: Vec::new(),
            target_aliases: Vec::new(),
            binary: None,
            divide_by: None,
            sentinel_widths: default_sentinel_widths(),
        }
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_target_alias(mut self, name: &str, from: Option<i32>, to: Option<i32>) -> Self {
        self.target_aliases.push(TargetAlias {
            name: name.to_string(),
            from,
            to,
        });
        self
    }

    #[must_use]
    pub fn with_binary(mut self, rule: BinaryRule) -> Self {
        self.binary = Some(rule);
        self
    }

    #[must_use]
    pub fn with_divisor(mut self, divisor: f64) -> Self {
        self.divide_by = Some(divisor);
        self
    }

    #[must_use]
    pub fn with_sentinel_widths(mut self, widths: &[u8]) -> Self {
        self.sentinel_widths = widths.to_vec();
        self
    }

    pub fn is_target(&self) -> bool {
        self.kind == ColumnKind::Target
    }

    /// Every raw name mapped to this entry, plain aliases first.
    pub fn raw_names(&self) -> impl Iterator<Item = &str> {
        self.aliases
            .iter()
            .map(String::as_str)
            .chain(self.target_aliases.iter().map(|alias| alias.name.as_str()))
    }
}
