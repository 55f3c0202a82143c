//! Query result model structs.

use serde::Serialize;

/// Options offered by each filter widget, cascading from year down to
/// culture. Years are newest first; labels are sorted.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub clusters: Vec<String>,
    pub blocks: Vec<String>,
    pub cultures: Vec<String>,
}

/// Outcome of loading one CSV source.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct LoadStats {
    pub loaded: u32,
    /// Rows dropped for a blank cluster or block label.
    pub skipped_blank_labels: u32,
    /// Rows dropped for an unreadable date or year.
    pub skipped_invalid: u32,
}

impl std::ops::AddAssign for LoadStats {
    fn add_assign(&mut self, other: LoadStats) {
        self.loaded += other.loaded;
        self.skipped_blank_labels += other.skipped_blank_labels;
        self.skipped_invalid += other.skipped_invalid;
    }
}
