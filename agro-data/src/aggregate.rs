//! Yearly aggregation: one row per (year, plot date), averaged across
//! locations, with a cross-year norm for every metric.
//!
//! The norm is the mean over the years present in the input, so it always
//! follows the active year filter rather than a fixed historical baseline.

use agro_core::metric::{Metric, MetricSet, MetricValues};
use agro_core::period::{Decade, Period};
use agro_core::plot_date::PlotDate;
use agro_core::record::DailyRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Running arithmetic mean that ignores missing values.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    sum: f64,
    count: u32,
}

impl MeanAcc {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RowAcc {
    metrics: [MeanAcc; Metric::COUNT],
    field_count: MeanAcc,
}

/// One (year, plot date) row of the yearly aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyRow {
    pub year: i32,
    pub plot_date: PlotDate,
    pub hover_date: String,
    pub month: u32,
    pub day: u32,
    pub decade: Decade,
    /// Mean of each metric over the locations sharing this (year, plot date).
    pub values: MetricValues,
    /// Mean of each metric over every year at this plot date.
    pub norms: MetricValues,
    pub field_count: Option<f64>,
}

impl YearlyRow {
    pub fn period(&self) -> Period {
        self.plot_date.period()
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(metric)
    }

    pub fn norm(&self, metric: Metric) -> Option<f64> {
        self.norms.get(metric)
    }
}

/// Yearly aggregate table, ordered by (year, plot date).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyAggregate {
    pub rows: Vec<YearlyRow>,
    /// Metrics whose columns exist in the source dataset.
    pub available: MetricSet,
}

impl YearlyAggregate {
    /// Collapse daily records sharing (year, plot date) into one row each.
    pub fn from_records(records: &[DailyRecord], available: MetricSet) -> Self {
        let mut groups: BTreeMap<(i32, PlotDate), RowAcc> = BTreeMap::new();
        for record in records {
            let acc = groups.entry((record.year, record.plot_date)).or_default();
            for metric in Metric::ALL {
                acc.metrics[metric as usize].push(record.value(metric));
            }
            acc.field_count.push(record.field_count);
        }

        let mut rows: Vec<YearlyRow> = groups
            .into_iter()
            .map(|((year, plot_date), acc)| {
                let mut values = MetricValues::new();
                for metric in Metric::ALL {
                    values.set(metric, acc.metrics[metric as usize].mean());
                }
                YearlyRow {
                    year,
                    plot_date,
                    hover_date: plot_date.hover_label(),
                    month: plot_date.month(),
                    day: plot_date.day(),
                    decade: plot_date.decade(),
                    values,
                    norms: MetricValues::new(),
                    field_count: acc.field_count.mean(),
                }
            })
            .collect();

        let norms = norms_by_plot_date(&rows);
        for row in &mut rows {
            if let Some(norm) = norms.get(&row.plot_date) {
                row.norms = *norm;
            }
        }

        log::debug!(
            "[Agro] aggregate: {} records -> {} yearly rows",
            records.len(),
            rows.len()
        );
        YearlyAggregate { rows, available }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.rows
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn rows_for_year(&self, year: i32) -> impl Iterator<Item = &YearlyRow> + '_ {
        self.rows.iter().filter(move |r| r.year == year)
    }

    /// Norm line for one metric: one point per distinct plot date.
    pub fn norm_series(&self, metric: Metric) -> Vec<(PlotDate, Option<f64>)> {
        let mut points: BTreeMap<PlotDate, Option<f64>> = BTreeMap::new();
        for row in &self.rows {
            points.entry(row.plot_date).or_insert(row.norm(metric));
        }
        points.into_iter().collect()
    }

    /// Rows on or after the given month/day, e.g. the accumulation window
    /// starting 14 May.
    pub fn since(&self, month: u32, day: u32) -> YearlyAggregate {
        self.retain(|r| r.plot_date.is_on_or_after(month, day))
    }

    /// Rows whose month lies in `first..=last`.
    pub fn in_months(&self, first: u32, last: u32) -> YearlyAggregate {
        self.retain(|r| (first..=last).contains(&r.month))
    }

    /// Rows for the given years only.
    pub fn for_years(&self, years: &[i32]) -> YearlyAggregate {
        self.retain(|r| years.contains(&r.year))
    }

    fn retain(&self, keep: impl Fn(&YearlyRow) -> bool) -> YearlyAggregate {
        YearlyAggregate {
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
            available: self.available,
        }
    }
}

fn norms_by_plot_date(rows: &[YearlyRow]) -> BTreeMap<PlotDate, MetricValues> {
    let mut accs: BTreeMap<PlotDate, [MeanAcc; Metric::COUNT]> = BTreeMap::new();
    for row in rows {
        let acc = accs.entry(row.plot_date).or_default();
        for metric in Metric::ALL {
            acc[metric as usize].push(row.value(metric));
        }
    }
    accs.into_iter()
        .map(|(plot_date, acc)| {
            let mut norm = MetricValues::new();
            for metric in Metric::ALL {
                norm.set(metric, acc[metric as usize].mean());
            }
            (plot_date, norm)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::record;

    fn sample_records() -> Vec<DailyRecord> {
        vec![
            record(2023, 6, 1).with_value(Metric::Mean, 20.0).with_field_count(2.0),
            record(2023, 6, 1).with_value(Metric::Mean, 22.0).with_field_count(4.0),
            record(2023, 6, 2).with_value(Metric::Mean, 18.0),
            record(2024, 6, 1).with_value(Metric::Mean, 25.0),
            record(2024, 6, 2)
                .with_value(Metric::Mean, 19.0)
                .with_value(Metric::Max, 27.0),
        ]
    }

    #[test]
    fn averages_locations_sharing_year_and_plot_date() {
        let agg = YearlyAggregate::from_records(&sample_records(), MetricSet::all());
        assert_eq!(agg.len(), 4);
        let first = &agg.rows[0];
        assert_eq!((first.year, first.month, first.day), (2023, 6, 1));
        assert!((first.value(Metric::Mean).unwrap() - 21.0).abs() < 1e-9);
        assert!((first.field_count.unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(first.hover_date, "01-Jun");
        assert_eq!(first.decade, Decade::First);
    }

    #[test]
    fn rows_ordered_by_year_then_date() {
        let agg = YearlyAggregate::from_records(&sample_records(), MetricSet::all());
        let keys: Vec<(i32, u32)> = agg.rows.iter().map(|r| (r.year, r.day)).collect();
        assert_eq!(keys, vec![(2023, 1), (2023, 2), (2024, 1), (2024, 2)]);
    }

    #[test]
    fn missing_values_are_skipped_not_zeroed() {
        let agg = YearlyAggregate::from_records(&sample_records(), MetricSet::all());
        let row = agg.rows_for_year(2023).find(|r| r.day == 2).unwrap();
        assert_eq!(row.value(Metric::Max), None);
        assert_eq!(row.field_count, None);
    }

    #[test]
    fn norm_is_cross_year_mean_per_plot_date() {
        let agg = YearlyAggregate::from_records(&sample_records(), MetricSet::all());
        for row in &agg.rows {
            let expected = if row.day == 1 { (21.0 + 25.0) / 2.0 } else { (18.0 + 19.0) / 2.0 };
            assert!((row.norm(Metric::Mean).unwrap() - expected).abs() < 1e-9);
        }
        // Only 2024 has a max on 2 June, so the norm equals that value.
        let row = agg.rows_for_year(2023).find(|r| r.day == 2).unwrap();
        assert_eq!(row.norm(Metric::Max), Some(27.0));
    }

    #[test]
    fn norm_follows_year_selection() {
        let only_2023: Vec<DailyRecord> = sample_records().into_iter().filter(|r| r.year == 2023).collect();
        let agg = YearlyAggregate::from_records(&only_2023, MetricSet::all());
        let row = &agg.rows[0];
        assert_eq!(row.norm(Metric::Mean), row.value(Metric::Mean));
    }

    #[test]
    fn recomputation_is_idempotent() {
        let records = sample_records();
        let a = YearlyAggregate::from_records(&records, MetricSet::all());
        let b = YearlyAggregate::from_records(&records, MetricSet::all());
        assert_eq!(a, b);
    }

    #[test]
    fn window_filters() {
        let records = vec![
            record(2024, 5, 13).with_value(Metric::SumTActive, 1.0),
            record(2024, 5, 14).with_value(Metric::SumTActive, 2.0),
            record(2024, 9, 1).with_value(Metric::SumTActive, 3.0),
        ];
        let agg = YearlyAggregate::from_records(&records, MetricSet::all());
        assert_eq!(agg.since(5, 14).len(), 2);
        assert_eq!(agg.in_months(9, 9).len(), 1);
        assert_eq!(agg.in_months(10, 12).len(), 0);
        assert_eq!(agg.for_years(&[2023]).len(), 0);
    }

    #[test]
    fn norm_series_has_one_point_per_plot_date() {
        let agg = YearlyAggregate::from_records(&sample_records(), MetricSet::all());
        let series = agg.norm_series(Metric::Mean);
        assert_eq!(series.len(), 2);
        assert!((series[0].1.unwrap() - 23.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_gives_empty_aggregate() {
        let agg = YearlyAggregate::from_records(&[], MetricSet::all());
        assert!(agg.is_empty());
        assert!(agg.years().is_empty());
    }
}
