//! Constructor page: two metrics on synced dual axes for chosen years.

use agro_core::metric::Metric;
use agro_data::aggregate::YearlyAggregate;
use agro_data::constructor::dual_axis_ranges;
use serde::Serialize;

use super::chart::{metric_options, Axis, Chart, MetricOption, SeriesSpec, SeriesStyle};
use super::PageContext;
use crate::state::{ConstructorControls, RightAxisStyle};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConstructorView {
    SelectYears {
        available: Vec<i32>,
    },
    Ready {
        available: Vec<i32>,
        years: Vec<i32>,
        left_options: Vec<MetricOption>,
        right_options: Vec<MetricOption>,
        right_style: RightAxisStyle,
        chart: Chart,
    },
}

pub fn render(aggregate: &YearlyAggregate, controls: &ConstructorControls, ctx: &PageContext) -> ConstructorView {
    let available = controls.available.clone();
    if controls.years.is_empty() {
        return ConstructorView::SelectYears { available };
    }

    let selected = aggregate.for_years(&controls.years);
    let (left, right) = (controls.left, controls.right);
    let mut chart = Chart::new("Comparison constructor", left.label());
    let left_spec = SeriesSpec {
        colors: ctx.colors,
        etalon: ctx.config.etalon_year,
        style: SeriesStyle::Line,
        axis: Axis::Left,
    };
    let right_spec = SeriesSpec {
        style: match controls.right_style {
            RightAxisStyle::Dashed => SeriesStyle::Dashed,
            RightAxisStyle::Bars => SeriesStyle::Bars,
        },
        axis: Axis::Right,
        ..left_spec
    };
    let name = |metric: Metric| move |year: i32| format!("{} {}", year, metric.label());
    chart.series = left_spec.per_year(&selected, left, name(left));
    chart.series.extend(right_spec.per_year(&selected, right, name(right)));
    if let Some((y_range, y2_range)) = dual_axis_ranges(aggregate, &controls.years, left, right) {
        chart.y_range = Some(y_range);
        chart.y2_range = Some(y2_range);
    }

    ConstructorView::Ready {
        available,
        years: controls.years.clone(),
        left_options: metric_options(&Metric::ALL, aggregate.available, &[left]),
        right_options: metric_options(&Metric::ALL, aggregate.available, &[right]),
        right_style: controls.right_style,
        chart,
    }
}
