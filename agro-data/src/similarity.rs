//! Year similarity scoring.
//!
//! Each year is reduced to a profile (the yearly maximum of every selected
//! metric) and compared against a reference year by mean clamped relative
//! distance. Scores are percentages in [0, 100].

use agro_core::error::{AgroError, Result};
use agro_core::metric::{Metric, MetricValues};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::YearlyAggregate;

/// Metrics compared when the user has not picked any yet.
pub const DEFAULT_SIMILARITY_METRICS: [Metric; 2] = [Metric::SumTActive, Metric::SumPrecipitation];

/// One row per year; each selected metric reduced to its yearly maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearProfile {
    rows: BTreeMap<i32, MetricValues>,
}

impl YearProfile {
    /// Build profiles from the yearly aggregate. Missing values are skipped;
    /// a year with no value for a metric keeps that cell missing.
    pub fn from_aggregate(aggregate: &YearlyAggregate, metrics: &[Metric]) -> Self {
        let mut rows: BTreeMap<i32, MetricValues> = BTreeMap::new();
        for row in &aggregate.rows {
            let profile = rows.entry(row.year).or_default();
            for &metric in metrics {
                let max = match (profile.get(metric), row.value(metric)) {
                    (Some(current), Some(v)) => Some(current.max(v)),
                    (None, v) => v,
                    (current, None) => current,
                };
                profile.set(metric, max);
            }
        }
        YearProfile { rows }
    }

    pub fn from_rows(rows: impl IntoIterator<Item = (i32, MetricValues)>) -> Self {
        YearProfile {
            rows: rows.into_iter().collect(),
        }
    }

    /// Years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.rows.keys().copied().collect()
    }

    pub fn get(&self, year: i32) -> Option<&MetricValues> {
        self.rows.get(&year)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.rows.contains_key(&year)
    }
}

/// Score of one year against the reference, with its profile values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSimilarity {
    pub year: i32,
    /// Percentage in [0, 100].
    pub score: f64,
    pub values: MetricValues,
}

/// Scores for every year, sorted by descending score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityTable {
    pub reference: i32,
    pub metrics: Vec<Metric>,
    pub rows: Vec<YearSimilarity>,
}

impl SimilarityTable {
    pub fn score_of(&self, year: i32) -> Option<f64> {
        self.rows.iter().find(|r| r.year == year).map(|r| r.score)
    }
}

/// Relative distance of `value` from `target`, clamped to [0, 1].
///
/// `None` if either side is missing or not finite. Against a zero target
/// the distance is 0 for an equal value and 1 for anything else.
pub fn metric_distance(value: Option<f64>, target: Option<f64>) -> Option<f64> {
    let (v, t) = (value?, target?);
    if !v.is_finite() || !t.is_finite() {
        return None;
    }
    let d = if t != 0.0 {
        (v - t).abs() / t.abs()
    } else if v == 0.0 {
        0.0
    } else {
        1.0
    };
    if d.is_nan() {
        return None;
    }
    Some(d.clamp(0.0, 1.0))
}

/// Score every profiled year against `reference` over `metrics`.
///
/// Metrics missing on either side are dropped from that year's average; a
/// year with no comparable metric scores 0.
pub fn score_years(
    profile: &YearProfile,
    reference: i32,
    metrics: &[Metric],
) -> Result<SimilarityTable> {
    let mut selected: Vec<Metric> = Vec::with_capacity(metrics.len());
    for &metric in metrics {
        if !selected.contains(&metric) {
            selected.push(metric);
        }
    }
    if selected.is_empty() {
        return Err(AgroError::EmptyMetricSet);
    }
    let target = profile
        .get(reference)
        .ok_or(AgroError::ReferenceNotFound(reference))?;

    let mut rows: Vec<YearSimilarity> = profile
        .rows
        .iter()
        .map(|(&year, values)| {
            let distances: Vec<f64> = selected
                .iter()
                .filter_map(|&m| metric_distance(values.get(m), target.get(m)))
                .collect();
            let score = if distances.is_empty() {
                0.0
            } else {
                let mean = distances.iter().sum::<f64>() / distances.len() as f64;
                (1.0 - mean) * 100.0
            };
            YearSimilarity {
                year,
                score,
                values: *values,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.score.total_cmp(&a.score).then(b.year.cmp(&a.year)));

    log::debug!(
        "[Agro] similarity: scored {} years against {} over {} metrics",
        rows.len(),
        reference,
        selected.len()
    );
    Ok(SimilarityTable {
        reference,
        metrics: selected,
        rows,
    })
}

/// The etalon year if it is among `years`, otherwise the most recent one.
pub fn default_reference_year(years: &[i32], etalon: i32) -> Option<i32> {
    if years.contains(&etalon) {
        Some(etalon)
    } else {
        years.iter().copied().max()
    }
}
