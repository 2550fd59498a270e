//! Name similarity between a registry alias and raw column names.

use rapidfuzz::distance::jaro_winkler;

/// Default minimum similarity for a suggestion.
pub const DEFAULT_CUTOFF: f64 = 0.8;

/// Best candidate for one alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub column: String,
    pub score: f64,
}

/// Jaro-Winkler matcher over upper-cased names.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMatcher {
    cutoff: f64,
}

impl Default for ColumnMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF)
    }
}

impl ColumnMatcher {
    pub fn new(cutoff: f64) -> Self {
        Self {
            cutoff: cutoff.clamp(0.0, 1.0),
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn similarity(&self, alias: &str, column: &str) -> f64 {
        jaro_winkler::similarity(
            alias.trim().to_uppercase().chars(),
            column.trim().to_uppercase().chars(),
        )
    }

    /// Highest scoring column at or above the cutoff. Ties keep the first
    /// column in table order.
    pub fn best_match<S: AsRef<str>>(&self, alias: &str, columns: &[S]) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for column in columns {
            let column = column.as_ref();
            let score = self.similarity(alias, column);
            if score < self.cutoff {
                continue;
            }
            if best.as_ref().is_none_or(|current| score > current.score) {
                best = Some(Candidate {
                    column: column.to_string(),
                    score,
                });
            }
        }
        best
    }
}
