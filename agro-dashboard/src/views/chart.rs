//! Chart payloads handed to the charting layer as JSON.

use agro_core::metric::{Metric, MetricSet};
use agro_core::plot_date::PlotDate;
use agro_data::aggregate::YearlyAggregate;
use agro_data::colors::ColorMap;
use agro_data::constructor::AxisRange;
use serde::Serialize;

pub const NORM_COLOR: &str = "black";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStyle {
    Line,
    Dashed,
    Dotted,
    Bars,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: PlotDate,
    pub hover: String,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub style: SeriesStyle,
    pub axis: Axis,
    /// Drawn heavier; set for the etalon year.
    pub emphasized: bool,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub label: Option<String>,
    pub color: String,
    pub style: SeriesStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub reference_lines: Vec<ReferenceLine>,
    pub y_range: Option<AxisRange>,
    pub y2_range: Option<AxisRange>,
}

impl Chart {
    pub fn new(title: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            y_label: y_label.into(),
            series: Vec::new(),
            reference_lines: Vec::new(),
            y_range: None,
            y2_range: None,
        }
    }
}

/// Selectable metric for radio buttons and pickers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricOption {
    pub metric: Metric,
    pub label: &'static str,
    pub selected: bool,
}

/// Picker entries for the metrics of `metrics` present in `available`.
pub fn metric_options(metrics: &[Metric], available: MetricSet, selected: &[Metric]) -> Vec<MetricOption> {
    metrics
        .iter()
        .filter(|&&metric| available.contains(metric))
        .map(|&metric| MetricOption {
            metric,
            label: metric.label(),
            selected: selected.contains(&metric),
        })
        .collect()
}

/// Styling shared by every per-year series of one chart.
pub struct SeriesSpec<'a> {
    pub colors: &'a ColorMap,
    pub etalon: i32,
    pub style: SeriesStyle,
    pub axis: Axis,
}

impl SeriesSpec<'_> {
    /// One series per year, ascending. Empty when the dataset lacks the
    /// metric.
    pub fn per_year(
        &self,
        aggregate: &YearlyAggregate,
        metric: Metric,
        name: impl Fn(i32) -> String,
    ) -> Vec<Series> {
        if !aggregate.available.contains(metric) {
            return Vec::new();
        }
        aggregate
            .years()
            .into_iter()
            .map(|year| Series {
                name: name(year),
                color: self.colors.get_or_default(year).to_string(),
                style: self.style,
                axis: self.axis,
                emphasized: year == self.etalon,
                points: aggregate
                    .rows_for_year(year)
                    .map(|row| Point {
                        x: row.plot_date,
                        hover: row.hover_date.clone(),
                        y: row.value(metric),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// The cross-year norm line, if the metric is available.
pub fn norm_series(
    aggregate: &YearlyAggregate,
    metric: Metric,
    name: &str,
    style: SeriesStyle,
) -> Option<Series> {
    if !aggregate.available.contains(metric) || aggregate.is_empty() {
        return None;
    }
    Some(Series {
        name: name.to_string(),
        color: NORM_COLOR.to_string(),
        style,
        axis: Axis::Left,
        emphasized: false,
        points: aggregate
            .norm_series(metric)
            .into_iter()
            .map(|(x, y)| Point {
                x,
                hover: x.hover_label(),
                y,
            })
            .collect(),
    })
}
