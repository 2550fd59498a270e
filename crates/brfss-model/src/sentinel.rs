//! "Don't know / refused / missing" codes of the survey coding convention.
//!
//! A field coded with `w` digits reserves the repdigits of 7, 8 and 9 at that
//! width. Five-digit fields do not occur in the survey, so width 5 carries no
//! codes.

/// Widths that carry sentinel codes.
pub const ALL_WIDTHS: [u8; 5] = [1, 2, 3, 4, 6];

const DIGITS: [u8; 3] = [7, 8, 9];

/// Every sentinel code at the given digit width.
pub fn codes_for_width(width: u8) -> Vec<f64> {
    if !ALL_WIDTHS.contains(&width) {
        return Vec::new();
    }
    DIGITS
        .iter()
        .map(|&digit| repdigit(digit, width))
        .collect()
}

fn repdigit(digit: u8, width: u8) -> f64 {
    let mut value = 0u64;
    for _ in 0..width {
        value = value * 10 + u64::from(digit);
    }
    value as f64
}

/// A set of sentinel codes restricted to some widths.
#[derive(Debug, Clone, PartialEq)]
pub struct SentinelSet {
    codes: Vec<f64>,
}

impl SentinelSet {
    /// The full set used by the defensive finalizer pass.
    pub fn full() -> Self {
        Self::for_widths(&ALL_WIDTHS)
    }

    pub fn for_widths(widths: &[u8]) -> Self {
        let mut codes: Vec<f64> = widths.iter().flat_map(|&w| codes_for_width(w)).collect();
        codes.sort_by(f64::total_cmp);
        codes.dedup();
        Self { codes }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.codes.iter().any(|code| *code == value)
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &[f64] {
        &self.codes
    }
}
