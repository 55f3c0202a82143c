use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::period::{Decade, Period};

/// Year every plot date is projected onto. 2024 is a leap year, so 29 February
/// of any season has a place on the shared axis.
pub const PLOT_YEAR: i32 = 2024;

/// Display format of the hover date, e.g. `14-May`.
pub const HOVER_DATE_FORMAT: &str = "%d-%b";

/// A calendar date with its year replaced by [`PLOT_YEAR`], so that several
/// seasons can be overlaid on the same time axis.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotDate(NaiveDate);

impl PlotDate {
    /// Create a PlotDate from a month and day.
    pub fn from_md_opt(month: u32, day: u32) -> Option<PlotDate> {
        NaiveDate::from_ymd_opt(PLOT_YEAR, month, day).map(PlotDate)
    }

    /// Project any calendar date onto the plot year.
    pub fn from_date(date: NaiveDate) -> PlotDate {
        // every (month, day) pair exists in a leap year
        PlotDate::from_md_opt(date.month(), date.day())
            .expect("plot year is a leap year")
    }

    /// Convert to a NaiveDate in the plot year.
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn decade(&self) -> Decade {
        Decade::from_day(self.day())
    }

    /// Month + decade bucket, e.g. `06-2`.
    pub fn period(&self) -> Period {
        Period::new(self.month(), self.decade())
    }

    /// Formatted display date (`%d-%b`).
    pub fn hover_label(&self) -> String {
        self.0.format(HOVER_DATE_FORMAT).to_string()
    }

    /// True if this date falls on or after the given month/day.
    pub fn is_on_or_after(&self, month: u32, day: u32) -> bool {
        (self.month(), self.day()) >= (month, day)
    }
}

impl From<NaiveDate> for PlotDate {
    fn from(value: NaiveDate) -> Self {
        PlotDate::from_date(value)
    }
}

impl From<PlotDate> for NaiveDate {
    fn from(value: PlotDate) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_onto_plot_year() {
        let date = NaiveDate::from_ymd_opt(2019, 6, 15).unwrap();
        let plot: PlotDate = date.into();
        assert_eq!(plot.as_naive_date(), NaiveDate::from_ymd_opt(PLOT_YEAR, 6, 15).unwrap());
        assert_eq!(plot.month(), 6);
        assert_eq!(plot.day(), 15);
    }

    #[test]
    fn leap_day_survives_projection() {
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        let plot = PlotDate::from_date(date);
        assert_eq!((plot.month(), plot.day()), (2, 29));
    }

    #[test]
    fn different_years_share_a_plot_date() {
        let a = PlotDate::from_date(NaiveDate::from_ymd_opt(2021, 9, 1).unwrap());
        let b = PlotDate::from_date(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn hover_label_format() {
        let plot = PlotDate::from_md_opt(5, 14).unwrap();
        assert_eq!(plot.hover_label(), "14-May");
    }

    #[test]
    fn invalid_month_day() {
        assert!(PlotDate::from_md_opt(2, 30).is_none());
        assert!(PlotDate::from_md_opt(13, 1).is_none());
    }

    #[test]
    fn accumulation_window_boundary() {
        assert!(PlotDate::from_md_opt(5, 14).unwrap().is_on_or_after(5, 14));
        assert!(PlotDate::from_md_opt(6, 1).unwrap().is_on_or_after(5, 14));
        assert!(!PlotDate::from_md_opt(5, 13).unwrap().is_on_or_after(5, 14));
        assert!(!PlotDate::from_md_opt(4, 30).unwrap().is_on_or_after(5, 14));
    }

    #[test]
    fn period_of_plot_date() {
        let plot = PlotDate::from_md_opt(6, 21).unwrap();
        assert_eq!(plot.period().to_string(), "06-3");
    }
}
