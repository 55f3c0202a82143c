//! Status ribbon figures: how many field-years the current selection covers.

use agro_core::filter::FilterState;
use agro_core::plot_date::PlotDate;
use agro_core::record::DailyRecord;
use serde::Serialize;
use std::collections::BTreeMap;

pub const ALL_CLUSTERS: &str = "All clusters";
pub const ALL_BLOCKS: &str = "All blocks";
pub const ALL_CULTURES: &str = "All cultures";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleSummary {
    /// Sum over years of the largest daily field count.
    pub total_scale: u64,
    /// Mean of the yearly maxima, truncated.
    pub avg_fields: u64,
    pub num_years: usize,
    pub etalon_year: i32,
    pub clusters: String,
    pub blocks: String,
    pub cultures: String,
}

impl ScaleSummary {
    /// `records` are the filtered daily rows; `selected_years` the resolved
    /// year selection.
    pub fn new(
        records: &[DailyRecord],
        filter: &FilterState,
        selected_years: &[i32],
        etalon_year: i32,
    ) -> Self {
        let mut daily: BTreeMap<(i32, PlotDate), f64> = BTreeMap::new();
        for record in records {
            *daily.entry((record.year, record.plot_date)).or_default() +=
                record.field_count.unwrap_or(0.0);
        }
        let mut yearly_max: BTreeMap<i32, f64> = BTreeMap::new();
        for ((year, _), sum) in daily {
            let max = yearly_max.entry(year).or_insert(sum);
            *max = max.max(sum);
        }

        let total: f64 = yearly_max.values().sum();
        let avg = if yearly_max.is_empty() {
            0.0
        } else {
            total / yearly_max.len() as f64
        };

        ScaleSummary {
            total_scale: total as u64,
            avg_fields: avg as u64,
            num_years: selected_years.len(),
            etalon_year,
            clusters: filter.clusters.describe(ALL_CLUSTERS),
            blocks: filter.blocks.describe(ALL_BLOCKS),
            cultures: filter.cultures.describe(ALL_CULTURES),
        }
    }

    /// Tooltip text for the locations counter.
    pub fn tooltip(&self) -> String {
        format!(
            "Analysis scale: ~{} fields x {} years of monitoring",
            self.avg_fields, self.num_years
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::record;
    use agro_core::filter::Selection;

    #[test]
    fn sums_daily_then_takes_yearly_max() {
        let records = vec![
            record(2023, 6, 1).with_field_count(10.0),
            record(2023, 6, 1).with_field_count(5.0),
            record(2023, 6, 2).with_field_count(12.0),
            record(2024, 6, 1).with_field_count(20.0),
            record(2024, 6, 2),
        ];
        let summary = ScaleSummary::new(&records, &FilterState::default(), &[2024, 2023], 2025);
        // 2023: max(15, 12) = 15; 2024: max(20, 0) = 20
        assert_eq!(summary.total_scale, 35);
        assert_eq!(summary.avg_fields, 17);
        assert_eq!(summary.num_years, 2);
        assert_eq!(summary.etalon_year, 2025);
    }

    #[test]
    fn describes_selection() {
        let filter = FilterState {
            clusters: Selection::only(vec!["North".to_string(), "South".to_string()]),
            ..FilterState::default()
        };
        let summary = ScaleSummary::new(&[], &filter, &[], 2025);
        assert_eq!(summary.clusters, "North, South");
        assert_eq!(summary.blocks, ALL_BLOCKS);
        assert_eq!(summary.cultures, ALL_CULTURES);
        assert_eq!(summary.total_scale, 0);
        assert_eq!(summary.avg_fields, 0);
    }
}
