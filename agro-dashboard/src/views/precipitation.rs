//! Precipitation page: accumulated rainfall and daily intensity bars.

use agro_core::metric::Metric;
use agro_data::aggregate::YearlyAggregate;
use serde::Serialize;

use super::chart::{norm_series, Axis, Chart, SeriesSpec, SeriesStyle};
use super::PageContext;
use crate::state::PrecipitationControls;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DailyPrecipitation {
    Chart(Chart),
    NoDataForMonths { first: u32, last: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationView {
    pub accumulated: Chart,
    pub months: (u32, u32),
    pub daily: DailyPrecipitation,
}

pub fn render(
    aggregate: &YearlyAggregate,
    controls: &PrecipitationControls,
    ctx: &PageContext,
) -> PrecipitationView {
    let line = SeriesSpec {
        colors: ctx.colors,
        etalon: ctx.config.etalon_year,
        style: SeriesStyle::Line,
        axis: Axis::Left,
    };
    let mut accumulated = Chart::new("Accumulated precipitation (mm)", "Precipitation, mm");
    accumulated.series = line.per_year(aggregate, Metric::SumPrecipitation, |y| y.to_string());
    accumulated.series.extend(norm_series(
        aggregate,
        Metric::SumPrecipitation,
        "Sample average",
        SeriesStyle::Dashed,
    ));

    let (first, last) = controls.months;
    let window = aggregate.in_months(first, last);
    let daily = if window.is_empty() {
        DailyPrecipitation::NoDataForMonths { first, last }
    } else {
        let bars = SeriesSpec {
            style: SeriesStyle::Bars,
            ..line
        };
        let mut chart = Chart::new(format!("Daily precipitation (months {} - {})", first, last), "mm");
        chart.series = bars.per_year(&window, Metric::Precipitation, |y| y.to_string());
        DailyPrecipitation::Chart(chart)
    };

    PrecipitationView {
        accumulated,
        months: controls.months,
        daily,
    }
}
