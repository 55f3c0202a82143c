//! Dashboard configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use agro_data::rain_risk::HEAVY_RAIN_THRESHOLD_MM;

/// Default aggregated dataset.
pub const DEFAULT_DATA_FILE: &str = "WEB_AGG_DATA.csv";

/// Reference year highlighted across the dashboard.
pub const DEFAULT_ETALON_YEAR: i32 = 2025;

/// A (month, day) pair without a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Aggregated dataset shards, loaded in order.
    pub data_paths: Vec<PathBuf>,
    /// Field-level summary CSV; the tables page works without it.
    pub fields_path: Option<PathBuf>,
    pub etalon_year: i32,
    pub heavy_rain_threshold_mm: f64,
    /// First day of the temperature accumulation window.
    pub accumulation_start: MonthDay,
    /// Initial month range of the daily precipitation chart.
    pub precipitation_months: (u32, u32),
    /// Shared passphrase; `None` leaves the dashboard open.
    #[serde(skip_serializing)]
    pub passphrase: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_paths: vec![PathBuf::from(DEFAULT_DATA_FILE)],
            fields_path: None,
            etalon_year: DEFAULT_ETALON_YEAR,
            heavy_rain_threshold_mm: HEAVY_RAIN_THRESHOLD_MM,
            accumulation_start: MonthDay { month: 5, day: 14 },
            precipitation_months: (9, 9),
            passphrase: None,
        }
    }
}
