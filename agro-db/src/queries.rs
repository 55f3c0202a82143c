//! Typed query methods over the loaded daily records.
//!
//! Filter selections map onto SQL: the "All" sentinel adds no condition and
//! an explicit subset becomes an `IN (...)` clause. Filter options cascade,
//! each level restricted by the selections above it.

use crate::models::FilterOptions;
use crate::schema::metric_column;
use crate::Database;
use agro_core::filter::{FilterState, Selection};
use agro_core::metric::{Metric, MetricSet, MetricValues};
use agro_core::record::DailyRecord;
use agro_utils::dates::parse_date;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

/// Conditions and bound parameters for a dynamic WHERE clause.
#[derive(Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Conditions {
    fn for_years(years: &Selection<i32>) -> Self {
        let mut c = Conditions::default();
        if let Some(values) = years.values() {
            c.push_in("year", values.iter().map(|&y| Value::Integer(y.into())));
        }
        c
    }

    fn with_labels(mut self, column: &str, selection: &Selection<String>) -> Self {
        if let Some(values) = selection.values() {
            self.push_in(column, values.iter().map(|v| Value::Text(v.clone())));
        }
        self
    }

    fn push_in(&mut self, column: &str, values: impl Iterator<Item = Value>) {
        let start = self.params.len();
        self.params.extend(values);
        let placeholders: Vec<String> = (start + 1..=self.params.len())
            .map(|i| format!("?{}", i))
            .collect();
        self.clauses
            .push(format!("{} IN ({})", column, placeholders.join(", ")));
    }

    fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }
}

impl Database {
    /// Number of loaded daily records.
    pub fn record_count(&self) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM daily_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Metrics whose columns appeared in any loaded header.
    pub fn available_metrics(&self) -> anyhow::Result<MetricSet> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare("SELECT metric FROM available_metrics")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids.iter().filter_map(|id| Metric::from_id(id)).collect())
    }

    /// Every year in the dataset, newest first.
    pub fn query_years(&self) -> anyhow::Result<Vec<i32>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare("SELECT DISTINCT year FROM daily_records ORDER BY year DESC")?;
        let years = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i32>, _>>()?;
        Ok(years)
    }

    fn distinct_labels(&self, column: &str, conditions: &Conditions) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut where_sql = conditions.sql();
        where_sql.push_str(if where_sql.is_empty() { "WHERE " } else { " AND " });
        where_sql.push_str(&format!("{} != ''", column));
        let sql = format!(
            "SELECT DISTINCT {col} FROM daily_records {where_sql} ORDER BY {col}",
            col = column,
            where_sql = where_sql
        );
        let mut stmt = conn.prepare(&sql)?;
        let labels = stmt
            .query_map(params_from_iter(conditions.params.iter()), |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(labels)
    }

    /// Widget options under the current selection: clusters among the
    /// selected years, blocks among those clusters, cultures among those
    /// blocks.
    pub fn query_filter_options(&self, filter: &FilterState) -> anyhow::Result<FilterOptions> {
        let years = self.query_years()?;
        let by_year = Conditions::for_years(&filter.years);
        let clusters = self.distinct_labels("cluster", &by_year)?;
        let by_cluster = by_year.with_labels("cluster", &filter.clusters);
        let blocks = self.distinct_labels("block", &by_cluster)?;
        let by_block = by_cluster.with_labels("block", &filter.blocks);
        let cultures = self.distinct_labels("culture", &by_block)?;
        log::debug!(
            "[Agro] query: filter options {} years, {} clusters, {} blocks, {} cultures",
            years.len(),
            clusters.len(),
            blocks.len(),
            cultures.len()
        );
        Ok(FilterOptions {
            years,
            clusters,
            blocks,
            cultures,
        })
    }

    /// Daily records matching every selection, sorted by (year, date) and
    /// then load order.
    pub fn query_records(&self, filter: &FilterState) -> anyhow::Result<Vec<DailyRecord>> {
        let conditions = Conditions::for_years(&filter.years)
            .with_labels("cluster", &filter.clusters)
            .with_labels("block", &filter.blocks)
            .with_labels("culture", &filter.cultures);
        let metric_cols: Vec<&str> = Metric::ALL.iter().map(|&m| metric_column(m)).collect();
        let sql = format!(
            "SELECT year, date, cluster, block, culture, field_count, {}
             FROM daily_records {}
             ORDER BY year, date, seq",
            metric_cols.join(", "),
            conditions.sql()
        );

        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&sql)?;
        let raw = stmt
            .query_map(params_from_iter(conditions.params.iter()), |row| {
                let mut values = MetricValues::new();
                for (i, metric) in Metric::ALL.into_iter().enumerate() {
                    values.set(metric, row.get(6 + i)?);
                }
                Ok((
                    row.get::<_, i32>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<f64>>(5)?,
                    values,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(raw.len());
        for (year, date, cluster, block, culture, field_count, values) in raw {
            let mut record = DailyRecord::new(year, parse_date(&date)?, cluster, block, culture);
            record.values = values;
            record.field_count = field_count;
            records.push(record);
        }
        log::info!("[Agro] query: query_records returned {} records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_CSV: &str = "\
year,date,Cluster,Block,Culture,Sum_T_active,Sum_Precipitation,precipitation,min,max,mean,field_count
2024,2024-06-02,North,B1,Wheat,510.0,80.0,4.0,12.0,26.0,19.0,10
2024,2024-06-01,North,B1,Wheat,500.0,76.0,0.0,11.0,25.0,18.0,10
2024,2024-06-01,North,B2,Corn,498.0,70.0,1.5,10.0,24.0,17.0,4
2024,2024-06-01,South,B3,Sunflower,530.0,60.0,0.0,13.0,28.0,20.5,7
2023,2023-06-01,North,B1,Wheat,450.0,90.0,6.0,9.0,22.0,15.5,9
2023,2023-06-01,East,B4,Wheat,440.0,95.0,7.0,8.0,21.0,14.5,3
";

    fn db() -> Database {
        let db = Database::new().unwrap();
        db.load_daily_records(FIXTURE_CSV).unwrap();
        db
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_query_years_descending() {
        assert_eq!(db().query_years().unwrap(), vec![2024, 2023]);
    }

    #[test]
    fn test_options_with_everything_selected() {
        let options = db().query_filter_options(&FilterState::default()).unwrap();
        assert_eq!(options.clusters, strings(&["East", "North", "South"]));
        assert_eq!(options.blocks, strings(&["B1", "B2", "B3", "B4"]));
        assert_eq!(options.cultures, strings(&["Corn", "Sunflower", "Wheat"]));
    }

    #[test]
    fn test_options_cascade() {
        let filter = FilterState {
            years: Selection::only(vec![2024]),
            clusters: Selection::only(strings(&["North"])),
            ..FilterState::default()
        };
        let options = db().query_filter_options(&filter).unwrap();
        // year options never narrow
        assert_eq!(options.years, vec![2024, 2023]);
        assert_eq!(options.clusters, strings(&["North", "South"]));
        assert_eq!(options.blocks, strings(&["B1", "B2"]));
        assert_eq!(options.cultures, strings(&["Corn", "Wheat"]));

        let filter = FilterState {
            blocks: Selection::only(strings(&["B1"])),
            ..filter
        };
        let options = db().query_filter_options(&filter).unwrap();
        assert_eq!(options.cultures, strings(&["Wheat"]));
    }

    #[test]
    fn test_query_records_sorted_and_typed() {
        let records = db().query_records(&FilterState::default()).unwrap();
        assert_eq!(records.len(), 6);
        let keys: Vec<(i32, String)> = records
            .iter()
            .map(|r| (r.year, r.date.to_string()))
            .collect();
        assert_eq!(keys[0], (2023, "2023-06-01".to_string()));
        assert_eq!(keys[5], (2024, "2024-06-02".to_string()));

        let first_2024 = &records[2];
        assert_eq!(first_2024.cluster, "North");
        assert_eq!(first_2024.block, "B1");
        assert!((first_2024.value(Metric::SumTActive).unwrap() - 500.0).abs() < 0.01);
        assert_eq!(first_2024.value(Metric::SumTEff0), None);
        assert_eq!(first_2024.field_count, Some(10.0));
    }

    #[test]
    fn test_query_records_filtered() {
        let filter = FilterState {
            cultures: Selection::only(strings(&["Wheat"])),
            clusters: Selection::only(strings(&["North", "East"])),
            ..FilterState::default()
        };
        let records = db().query_records(&filter).unwrap();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.culture == "Wheat"));

        let none = FilterState {
            years: Selection::only(vec![2019]),
            ..FilterState::default()
        };
        assert!(db().query_records(&none).unwrap().is_empty());
    }
}
