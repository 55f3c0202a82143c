//! Temperature page: heat accumulation and daily temperatures.

use agro_data::aggregate::YearlyAggregate;
use serde::Serialize;

use super::chart::{metric_options, norm_series, Axis, Chart, MetricOption, ReferenceLine, SeriesSpec, SeriesStyle};
use super::PageContext;
use crate::state::{TemperatureControls, ACCUMULATION_METRICS, DAILY_TEMPERATURE_METRICS};

pub const FROST_LINE_C: f64 = -1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureView {
    pub accumulation_options: Vec<MetricOption>,
    pub accumulation: Chart,
    pub daily_options: Vec<MetricOption>,
    pub daily: Chart,
}

pub fn render(aggregate: &YearlyAggregate, controls: &TemperatureControls, ctx: &PageContext) -> TemperatureView {
    let start = ctx.config.accumulation_start;
    let window = aggregate.since(start.month, start.day);
    let metric = controls.accumulation;

    let mut accumulation = Chart::new(
        format!(
            "Accumulation: {} (from {:02}/{:02})",
            metric.label(),
            start.day,
            start.month
        ),
        metric.label(),
    );
    let spec = SeriesSpec {
        colors: ctx.colors,
        etalon: ctx.config.etalon_year,
        style: SeriesStyle::Line,
        axis: Axis::Left,
    };
    accumulation.series = spec.per_year(&window, metric, |y| y.to_string());
    accumulation
        .series
        .extend(norm_series(&window, metric, "Average (norm)", SeriesStyle::Dashed));

    let daily_metric = controls.daily;
    let mut daily = Chart::new("Daily temperature (whole year)", "°C");
    daily.series = spec.per_year(aggregate, daily_metric, |y| y.to_string());
    daily
        .series
        .extend(norm_series(aggregate, daily_metric, "Average (norm)", SeriesStyle::Dotted));
    daily.reference_lines = vec![
        ReferenceLine {
            y: FROST_LINE_C,
            label: Some("-1°C (frost)".to_string()),
            color: "red".to_string(),
            style: SeriesStyle::Dashed,
        },
        ReferenceLine {
            y: 0.0,
            label: None,
            color: "gray".to_string(),
            style: SeriesStyle::Line,
        },
    ];

    TemperatureView {
        accumulation_options: metric_options(&ACCUMULATION_METRICS, aggregate.available, &[metric]),
        accumulation,
        daily_options: metric_options(&DAILY_TEMPERATURE_METRICS, aggregate.available, &[daily_metric]),
        daily,
    }
}
