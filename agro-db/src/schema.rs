//! SQL schema for the in-memory SQLite database.
//!
//! One wide table of daily records (one column per catalog metric) and a
//! small table recording which metric columns the loaded datasets carried.

use agro_core::metric::Metric;

/// Column of `daily_records` holding `metric`.
pub fn metric_column(metric: Metric) -> &'static str {
    match metric {
        Metric::SumTActive => "sum_t_active",
        Metric::SumTEff0 => "sum_t_eff_0",
        Metric::SumTEff10 => "sum_t_eff_10",
        Metric::SumPrecipitation => "sum_precipitation",
        Metric::Precipitation => "precipitation",
        Metric::Min => "t_min",
        Metric::Max => "t_max",
        Metric::Mean => "t_mean",
    }
}

/// Returns the full SQL schema as a single batch string.
///
/// - `daily_records` - one row per (location, date); `seq` keeps load order
///   so that shards concatenate before sorting
/// - `available_metrics` - metric identifiers present in any loaded header
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS daily_records (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        year INTEGER NOT NULL,
        date TEXT NOT NULL,
        cluster TEXT NOT NULL,
        block TEXT NOT NULL,
        culture TEXT NOT NULL,
        sum_t_active REAL,
        sum_t_eff_0 REAL,
        sum_t_eff_10 REAL,
        sum_precipitation REAL,
        precipitation REAL,
        t_min REAL,
        t_max REAL,
        t_mean REAL,
        field_count REAL
    );
    CREATE INDEX IF NOT EXISTS idx_daily_year_date ON daily_records(year, date);
    CREATE INDEX IF NOT EXISTS idx_daily_labels ON daily_records(cluster, block, culture);

    CREATE TABLE IF NOT EXISTS available_metrics (
        metric TEXT PRIMARY KEY
    );
    "#
}
