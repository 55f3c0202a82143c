use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::metric::{Metric, MetricValues};
use crate::period::{Decade, Period};
use crate::plot_date::PlotDate;

/// Column names in the input datasets.
pub mod columns {
    pub const YEAR: &str = "year";
    pub const DATE: &str = "date";
    pub const PLOT_DATE: &str = "plot_date";
    pub const CLUSTER: &str = "Cluster";
    pub const BLOCK: &str = "Block";
    pub const CULTURE: &str = "Culture";
    pub const FIELD_COUNT: &str = "field_count";
}

/// One row per (location, date): labels and daily metric values.
///
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    pub year: i32,
    pub date: NaiveDate,
    pub plot_date: PlotDate,
    pub cluster: String,
    pub block: String,
    pub culture: String,
    pub values: MetricValues,
    /// Number of fields averaged into this row, if the dataset carries it.
    pub field_count: Option<f64>,
}

impl DailyRecord {
    /// Build a record for `date`, deriving the plot date.
    pub fn new(
        year: i32,
        date: NaiveDate,
        cluster: impl Into<String>,
        block: impl Into<String>,
        culture: impl Into<String>,
    ) -> Self {
        DailyRecord {
            year,
            date,
            plot_date: PlotDate::from_date(date),
            cluster: cluster.into(),
            block: block.into(),
            culture: culture.into(),
            values: MetricValues::new(),
            field_count: None,
        }
    }

    pub fn with_value(mut self, metric: Metric, value: f64) -> Self {
        self.values.set(metric, Some(value));
        self
    }

    pub fn with_field_count(mut self, count: f64) -> Self {
        self.field_count = Some(count);
        self
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn decade(&self) -> Decade {
        Decade::from_day(self.day())
    }

    pub fn period(&self) -> Period {
        self.plot_date.period()
    }

    pub fn hover_date(&self) -> String {
        self.plot_date.hover_label()
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(metric)
    }
}
