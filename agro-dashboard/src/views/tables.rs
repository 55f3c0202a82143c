//! Tables page: the aggregated report and the field summary.

use agro_core::filter::FilterState;
use agro_core::metric::Metric;
use agro_data::aggregate::YearlyAggregate;
use agro_data::field_summary::FieldSummary;
use serde::Serialize;

const ALL: &str = "All";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    pub cluster: String,
    pub block: String,
    pub culture: String,
    pub year: i32,
    pub date: String,
    /// One cell per metric column, then one per norm column.
    pub cells: Vec<Option<f64>>,
}

/// One row per (year, plot date) with every available metric and its norm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedTable {
    pub headers: Vec<String>,
    pub rows: Vec<AggregatedRow>,
}

impl AggregatedTable {
    pub fn new(aggregate: &YearlyAggregate, filter: &FilterState) -> Self {
        let metrics: Vec<Metric> = Metric::ALL
            .into_iter()
            .filter(|&m| aggregate.available.contains(m))
            .collect();

        let mut headers: Vec<String> = ["Cluster", "Block", "Culture", "Year", "Date"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        headers.extend(metrics.iter().map(|m| m.label().to_string()));
        headers.extend(metrics.iter().map(|m| m.norm_label()));

        let cluster = filter.clusters.describe(ALL);
        let block = filter.blocks.describe(ALL);
        let culture = filter.cultures.describe(ALL);
        let rows = aggregate
            .rows
            .iter()
            .map(|row| AggregatedRow {
                cluster: cluster.clone(),
                block: block.clone(),
                culture: culture.clone(),
                year: row.year,
                date: row.hover_date.clone(),
                cells: metrics
                    .iter()
                    .map(|&m| row.value(m))
                    .chain(metrics.iter().map(|&m| row.norm(m)))
                    .collect(),
            })
            .collect();
        AggregatedTable { headers, rows }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FieldsView {
    /// No field summary file was configured or it could not be read.
    NotLoaded,
    NothingFound,
    Table { count: usize, summary: FieldSummary },
}

impl FieldsView {
    pub fn new(fields: Option<&FieldSummary>, filter: &FilterState, selected_years: &[i32]) -> Self {
        let Some(fields) = fields else {
            return FieldsView::NotLoaded;
        };
        let summary = fields.filter(filter, selected_years).ordered();
        if summary.is_empty() {
            FieldsView::NothingFound
        } else {
            FieldsView::Table {
                count: summary.len(),
                summary,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablesView {
    pub aggregated: AggregatedTable,
    pub fields: FieldsView,
}
