//! Per-column fallback values threaded from one survey year to the next.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical column name to the previous year's most frequent value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarriedStats {
    modes: BTreeMap<String, f64>,
}

impl CarriedStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.modes.get(column).copied()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: f64) {
        self.modes.insert(column.into(), value);
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.modes.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl FromIterator<(String, f64)> for CarriedStats {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            modes: iter.into_iter().collect(),
        }
    }
}
