//! Session filter selections.
//!
//! Each filter is either the "All" sentinel or an explicit, non-empty subset.
//! Picking a specific value while "All" is active drops the sentinel; picking
//! "All" after specific values drops them.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::record::DailyRecord;

/// One entry of a multiselect widget: the sentinel or a concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice<T> {
    All,
    Value(T),
}

/// An "All" sentinel or an explicit non-empty subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<T> {
    All,
    Only(Vec<T>),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: Clone + PartialEq> Selection<T> {
    /// An explicit subset; an empty list collapses to `All`.
    pub fn only(values: Vec<T>) -> Self {
        let mut unique: Vec<T> = Vec::with_capacity(values.len());
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        if unique.is_empty() {
            Selection::All
        } else {
            Selection::Only(unique)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => values.contains(value),
        }
    }

    /// Explicit values, or `None` for the sentinel.
    pub fn values(&self) -> Option<&[T]> {
        match self {
            Selection::All => None,
            Selection::Only(values) => Some(values),
        }
    }

    /// Interpret the full list a multiselect widget reports after a change,
    /// in the order the entries were picked.
    ///
    /// An empty list becomes `All`. A list holding the sentinel among other
    /// entries becomes `All` if the sentinel was picked last, otherwise the
    /// sentinel is dropped.
    pub fn from_widget(choices: &[Choice<T>]) -> Self {
        if choices.is_empty() {
            return Selection::All;
        }
        if let Some(Choice::All) = choices.last() {
            return Selection::All;
        }
        let values: Vec<T> = choices
            .iter()
            .filter_map(|c| match c {
                Choice::All => None,
                Choice::Value(v) => Some(v.clone()),
            })
            .collect();
        Selection::only(values)
    }

    /// The widget list that represents this selection.
    pub fn to_widget(&self) -> Vec<Choice<T>> {
        match self {
            Selection::All => vec![Choice::All],
            Selection::Only(values) => values.iter().cloned().map(Choice::Value).collect(),
        }
    }

    /// Add a specific value; drops the sentinel.
    pub fn select(&self, value: T) -> Self {
        let mut values = self.values().map(|v| v.to_vec()).unwrap_or_default();
        values.push(value);
        Selection::only(values)
    }

    /// Remove a specific value; removing the last one falls back to `All`.
    pub fn deselect(&self, value: &T) -> Self {
        match self {
            Selection::All => Selection::All,
            Selection::Only(values) => {
                Selection::only(values.iter().filter(|v| *v != value).cloned().collect())
            }
        }
    }

    /// The concrete values this selection stands for among `options`.
    pub fn resolve(&self, options: &[T]) -> Vec<T> {
        match self {
            Selection::All => options.to_vec(),
            Selection::Only(values) => values.clone(),
        }
    }
}

impl<T: Display> Selection<T> {
    /// Comma-joined values, or `all_label` for the sentinel.
    pub fn describe(&self, all_label: &str) -> String {
        match self {
            Selection::All => all_label.to_string(),
            Selection::Only(values) => values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Which filter a widget event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterField {
    Year,
    Cluster,
    Block,
    Culture,
}

/// Year, cluster, block and crop selections for one session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub years: Selection<i32>,
    pub clusters: Selection<String>,
    pub blocks: Selection<String>,
    pub cultures: Selection<String>,
}

impl FilterState {
    /// Every selection back to "All".
    pub fn reset(&self) -> Self {
        FilterState::default()
    }

    pub fn matches(&self, record: &DailyRecord) -> bool {
        self.years.matches(&record.year)
            && self.clusters.matches(&record.cluster)
            && self.blocks.matches(&record.block)
            && self.cultures.matches(&record.culture)
    }
}
