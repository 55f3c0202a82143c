//! Record builders shared by the unit tests.

use agro_core::metric::Metric;
use agro_core::record::DailyRecord;
use chrono::NaiveDate;

pub fn record(year: i32, month: u32, day: u32) -> DailyRecord {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
    DailyRecord::new(year, date, "North", "B1", "Wheat")
}

pub fn rain(year: i32, month: u32, day: u32, mm: f64) -> DailyRecord {
    record(year, month, day).with_value(Metric::Precipitation, mm)
}
