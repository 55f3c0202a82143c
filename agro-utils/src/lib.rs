//! Shared utility functions for agro dashboard crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse a date string in "YYYYMMDD" format
    pub fn parse_date_compact(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y%m%d")?)
    }

    /// Parse the date forms found in exported datasets:
    /// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
    /// `YYYYMMDD` and `DD.MM.YYYY`.
    pub fn parse_any_date(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        if let Ok(date) = parse_date(s) {
            return Ok(date);
        }
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(dt.date());
            }
        }
        if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
            return parse_date_compact(s);
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%d.%m.%Y") {
            return Ok(date);
        }
        anyhow::bail!("unrecognised date '{}'", s)
    }

}

/// Label cleaning for region/block/crop columns
pub mod labels {
    /// True for labels that stand for a missing value: empty, `nan` or `none`
    /// (any case, surrounding whitespace ignored).
    pub fn is_blank_label(s: &str) -> bool {
        let s = s.trim();
        s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("none")
    }

}

/// Number parsing for metric cells
pub mod numbers {
    /// Parse a numeric cell; empty, non-numeric and non-finite cells are missing.
    pub fn parse_cell(s: &str) -> Option<f64> {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

}
