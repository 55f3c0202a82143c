//! CSV loading for populating the in-memory SQLite database.
//!
//! The aggregated dataset is a headed CSV, optionally split into several
//! shard files and optionally gzipped:
//!
//! ```text
//! year,date,Cluster,Block,Culture,Sum_T_active,...,mean,field_count
//! 2024,2024-05-14,North,B1,Wheat,412.5,...,17.2,38
//! ```
//!
//! Header names are matched case-insensitively. `date` falls back to
//! `plot_date`; `year` falls back to the date's year. Metric columns missing
//! from the header leave that metric unavailable.

use crate::models::LoadStats;
use crate::schema::metric_column;
use crate::Database;
use agro_core::error::AgroError;
use agro_core::metric::Metric;
use agro_core::record::columns;
use agro_utils::dates::{format_date, parse_any_date};
use agro_utils::labels::is_blank_label;
use agro_utils::numbers::parse_cell;
use chrono::Datelike;
use flate2::read::GzDecoder;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Positions of the known columns in one CSV header.
struct HeaderMap {
    year: Option<usize>,
    date: usize,
    cluster: usize,
    block: usize,
    culture: Option<usize>,
    field_count: Option<usize>,
    metrics: Vec<(Metric, usize)>,
}

impl HeaderMap {
    fn new(headers: &csv::StringRecord) -> anyhow::Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        };
        let missing = |name: &str| AgroError::InvalidFormat(format!("missing '{}' column", name));

        let date = find(columns::DATE)
            .or_else(|| find(columns::PLOT_DATE))
            .ok_or_else(|| missing(columns::DATE))?;
        let cluster = find(columns::CLUSTER).ok_or_else(|| missing(columns::CLUSTER))?;
        let block = find(columns::BLOCK).ok_or_else(|| missing(columns::BLOCK))?;
        let metrics = Metric::ALL
            .into_iter()
            .filter_map(|m| find(m.id()).map(|i| (m, i)))
            .collect();
        Ok(HeaderMap {
            year: find(columns::YEAR),
            date,
            cluster,
            block,
            culture: find(columns::CULTURE),
            field_count: find(columns::FIELD_COUNT),
            metrics,
        })
    }
}

fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    s.parse::<i32>()
        .ok()
        .or_else(|| parse_cell(s).filter(|v| v.fract() == 0.0).map(|v| v as i32))
}

impl Database {
    /// Load daily records from CSV text.
    pub fn load_daily_records(&self, csv_data: &str) -> anyhow::Result<LoadStats> {
        self.load_daily_reader(csv_data.as_bytes())
    }

    /// Load daily records from any CSV reader.
    ///
    /// Rows with a blank `Cluster` or `Block` (empty, `nan`, `none`) are
    /// dropped; rows with an unreadable date are skipped. A blank `Culture`
    /// is stored as an empty label.
    pub fn load_daily_reader<R: Read>(&self, reader: R) -> anyhow::Result<LoadStats> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let header = HeaderMap::new(rdr.headers()?)?;

        let tx = conn.unchecked_transaction()?;
        for (metric, _) in &header.metrics {
            tx.execute(
                "INSERT OR IGNORE INTO available_metrics (metric) VALUES (?1)",
                [metric.id()],
            )?;
        }

        let metric_cols: Vec<&str> = header.metrics.iter().map(|(m, _)| metric_column(*m)).collect();
        let mut column_list = vec!["year", "date", "cluster", "block", "culture", "field_count"];
        column_list.extend(&metric_cols);
        let placeholders: Vec<String> = (1..=column_list.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO daily_records ({}) VALUES ({})",
            column_list.join(", "),
            placeholders.join(", ")
        );

        let mut stats = LoadStats::default();
        {
            let mut stmt = tx.prepare(&sql)?;
            for result in rdr.records() {
                let r = result?;
                let cell = |i: usize| r.get(i).unwrap_or("").trim();

                let cluster = cell(header.cluster);
                let block = cell(header.block);
                if is_blank_label(cluster) || is_blank_label(block) {
                    stats.skipped_blank_labels += 1;
                    continue;
                }
                let date = match parse_any_date(cell(header.date)) {
                    Ok(d) => d,
                    Err(_) => {
                        stats.skipped_invalid += 1;
                        continue;
                    }
                };
                let year = match header.year {
                    Some(i) => match parse_year(cell(i)) {
                        Some(y) => y,
                        None => {
                            stats.skipped_invalid += 1;
                            continue;
                        }
                    },
                    None => date.year(),
                };
                let culture = header
                    .culture
                    .map(cell)
                    .filter(|c| !is_blank_label(c))
                    .unwrap_or("");

                let mut values: Vec<Value> = vec![
                    Value::Integer(year.into()),
                    Value::Text(format_date(&date)),
                    Value::Text(cluster.to_string()),
                    Value::Text(block.to_string()),
                    Value::Text(culture.to_string()),
                    header
                        .field_count
                        .and_then(|i| parse_cell(cell(i)))
                        .map_or(Value::Null, Value::Real),
                ];
                values.extend(
                    header
                        .metrics
                        .iter()
                        .map(|(_, i)| parse_cell(cell(*i)).map_or(Value::Null, Value::Real)),
                );
                stmt.execute(params_from_iter(values.iter()))?;
                stats.loaded += 1;
            }
        }
        tx.commit()?;

        log::info!(
            "[Agro] loader: Loaded {} records, skipped {} blank labels, {} invalid rows",
            stats.loaded,
            stats.skipped_blank_labels,
            stats.skipped_invalid
        );
        Ok(stats)
    }

    /// Load one shard file; `.gz` files are decompressed on the fly.
    ///
    /// A missing or unreadable file is reported as
    /// [`AgroError::DataUnavailable`].
    pub fn load_shard_file(&self, path: &Path) -> anyhow::Result<LoadStats> {
        let file = File::open(path).map_err(|e| AgroError::DataUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let reader = BufReader::new(file);
        let gzipped = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        log::info!("[Agro] loader: Reading {}", path.display());
        if gzipped {
            self.load_daily_reader(GzDecoder::new(reader))
        } else {
            self.load_daily_reader(reader)
        }
    }

    /// Load every shard in order. Queries sort by (year, date), so the
    /// concatenation order only decides ties.
    pub fn load_shards<P: AsRef<Path>>(&self, paths: &[P]) -> anyhow::Result<LoadStats> {
        let mut total = LoadStats::default();
        for path in paths {
            total += self.load_shard_file(path.as_ref())?;
        }
        log::info!(
            "[Agro] loader: {} shards, {} records in total",
            paths.len(),
            total.loaded
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agro_core::metric::MetricSet;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use std::path::PathBuf;

    const SAMPLE_CSV: &str = "\
year,date,Cluster,Block,Culture,Sum_T_active,precipitation,mean,field_count
2024,2024-05-14,North,B1,Wheat,412.5,2.4,17.2,38
2024,2024-05-15,North,B1,Wheat,420.0,,16.8,38
2024,2024-05-15,nan,B1,Wheat,1,1,1,1
2024,2024-05-15,South, None ,Corn,1,1,1,1
2023,20230514,South,B2,,380.0,0.0,15.1,12
";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("agro-db-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_daily_records() {
        let db = Database::new().unwrap();
        let stats = db.load_daily_records(SAMPLE_CSV).unwrap();
        assert_eq!(stats.loaded, 3);
        assert_eq!(stats.skipped_blank_labels, 2);
        assert_eq!(stats.skipped_invalid, 0);
        assert_eq!(db.record_count().unwrap(), 3);
    }

    #[test]
    fn test_available_metrics_follow_header() {
        let db = Database::new().unwrap();
        db.load_daily_records(SAMPLE_CSV).unwrap();
        let available = db.available_metrics().unwrap();
        let expected: MetricSet = [Metric::SumTActive, Metric::Precipitation, Metric::Mean]
            .into_iter()
            .collect();
        assert_eq!(available, expected);
    }

    #[test]
    fn test_year_derived_from_plot_date() {
        let csv = "\
plot_date,cluster,block,culture,max
14.05.2022,North,B1,Wheat,25.5
";
        let db = Database::new().unwrap();
        db.load_daily_records(csv).unwrap();
        assert_eq!(db.query_years().unwrap(), vec![2022]);
    }

    #[test]
    fn test_invalid_dates_are_skipped() {
        let csv = "\
date,Cluster,Block
not-a-date,North,B1
2024-06-01,North,B1
";
        let db = Database::new().unwrap();
        let stats = db.load_daily_records(csv).unwrap();
        assert_eq!(stats.loaded, 1);
        assert_eq!(stats.skipped_invalid, 1);
    }

    #[test]
    fn test_missing_label_column_is_an_error() {
        let db = Database::new().unwrap();
        assert!(db.load_daily_records("date,Block\n2024-06-01,B1\n").is_err());
    }

    #[test]
    fn test_load_gzipped_shard() {
        let path = temp_path("shard.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let db = Database::new().unwrap();
        let stats = db.load_shard_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(stats.loaded, 3);
    }

    #[test]
    fn test_missing_shard_is_data_unavailable() {
        let db = Database::new().unwrap();
        let err = db.load_shard_file(&temp_path("absent.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AgroError>(),
            Some(AgroError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_shards_concatenate() {
        let first = temp_path("part-1.csv");
        let second = temp_path("part-2.csv");
        std::fs::write(&first, "year,date,Cluster,Block,Culture,mean\n2024,2024-06-01,North,B1,Wheat,20\n").unwrap();
        std::fs::write(&second, "year,date,Cluster,Block,Culture,mean\n2023,2023-06-01,North,B1,Wheat,18\n").unwrap();

        let db = Database::new().unwrap();
        let stats = db.load_shards(&[&first, &second]).unwrap();
        std::fs::remove_file(&first).unwrap();
        std::fs::remove_file(&second).unwrap();
        assert_eq!(stats.loaded, 2);
        assert_eq!(db.query_years().unwrap(), vec![2024, 2023]);
    }
}
