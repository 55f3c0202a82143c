//! Analytics page: rain-risk heatmaps and year similarity.

use agro_core::error::AgroError;
use agro_core::metric::Metric;
use agro_data::aggregate::YearlyAggregate;
use agro_data::rain_risk::{rain_risk, RainRiskMatrices};
use agro_data::similarity::{default_reference_year, score_years, YearProfile, YearSimilarity};
use serde::Serialize;

use super::chart::{metric_options, MetricOption};
use super::PageContext;
use crate::state::AnalyticsControls;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RainRiskView {
    Ready(RainRiskMatrices),
    Unavailable { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SimilarityView {
    SelectMetrics { message: String },
    /// The reference year is absent from the filtered data; nothing scored.
    NoResult { reference: Option<i32>, message: String },
    Ready {
        reference: i32,
        labels: Vec<&'static str>,
        rows: Vec<YearSimilarity>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsView {
    pub rain_risk: RainRiskView,
    pub metric_options: Vec<MetricOption>,
    /// Newest first.
    pub reference_options: Vec<i32>,
    pub similarity: SimilarityView,
}

fn similarity(aggregate: &YearlyAggregate, controls: &AnalyticsControls, etalon: i32) -> SimilarityView {
    let years = aggregate.years();
    let Some(reference) = controls
        .reference
        .or_else(|| default_reference_year(&years, etalon))
    else {
        return SimilarityView::NoResult {
            reference: None,
            message: AgroError::EmptyFilterResult.to_string(),
        };
    };

    let metrics: Vec<Metric> = controls
        .metrics
        .iter()
        .copied()
        .filter(|&m| aggregate.available.contains(m))
        .collect();
    let profile = YearProfile::from_aggregate(aggregate, &metrics);
    match score_years(&profile, reference, &metrics) {
        Ok(table) => SimilarityView::Ready {
            reference,
            labels: table.metrics.iter().map(|m| m.label()).collect(),
            rows: table.rows,
        },
        Err(err @ AgroError::EmptyMetricSet) => SimilarityView::SelectMetrics {
            message: err.to_string(),
        },
        Err(err) => {
            log::warn!("[Agro] analytics: {}", err);
            SimilarityView::NoResult {
                reference: Some(reference),
                message: err.to_string(),
            }
        }
    }
}

pub fn render(aggregate: &YearlyAggregate, controls: &AnalyticsControls, ctx: &PageContext) -> AnalyticsView {
    let rain_risk = match rain_risk(aggregate, ctx.config.heavy_rain_threshold_mm) {
        Ok(matrices) => RainRiskView::Ready(matrices),
        Err(err) => RainRiskView::Unavailable {
            message: err.to_string(),
        },
    };
    let mut reference_options = aggregate.years();
    reference_options.reverse();

    AnalyticsView {
        rain_risk,
        metric_options: metric_options(&Metric::ALL, aggregate.available, &controls.metrics),
        reference_options,
        similarity: similarity(aggregate, controls, ctx.config.etalon_year),
    }
}
