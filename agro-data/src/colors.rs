//! Year color assignment for chart series.

use serde::Serialize;
use std::collections::BTreeMap;

/// Qualitative "Safe" palette, colorblind friendly.
pub const SAFE_PALETTE: [&str; 11] = [
    "rgb(136, 204, 238)",
    "rgb(204, 102, 119)",
    "rgb(221, 204, 119)",
    "rgb(17, 119, 51)",
    "rgb(51, 34, 136)",
    "rgb(170, 68, 153)",
    "rgb(68, 170, 153)",
    "rgb(153, 153, 51)",
    "rgb(136, 34, 85)",
    "rgb(102, 17, 0)",
    "rgb(136, 136, 136)",
];

pub const ETALON_COLOR: &str = "red";

/// Used for a year the map does not know about.
pub const FALLBACK_COLOR: &str = "#1f77b4";

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ColorMap(BTreeMap<i32, String>);

impl ColorMap {
    /// Colors by ascending year position; the etalon year is always red.
    pub fn new(years: &[i32], etalon: i32) -> Self {
        let mut sorted = years.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let colors = sorted
            .into_iter()
            .enumerate()
            .map(|(i, year)| {
                let color = if year == etalon {
                    ETALON_COLOR
                } else {
                    SAFE_PALETTE[i % SAFE_PALETTE.len()]
                };
                (year, color.to_string())
            })
            .collect();
        ColorMap(colors)
    }

    pub fn get(&self, year: i32) -> Option<&str> {
        self.0.get(&year).map(String::as_str)
    }

    pub fn get_or_default(&self, year: i32) -> &str {
        self.get(year).unwrap_or(FALLBACK_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etalon_is_red_and_others_follow_palette() {
        let colors = ColorMap::new(&[2025, 2023, 2024], 2025);
        assert_eq!(colors.get(2023), Some(SAFE_PALETTE[0]));
        assert_eq!(colors.get(2024), Some(SAFE_PALETTE[1]));
        assert_eq!(colors.get(2025), Some("red"));
    }

    #[test]
    fn palette_wraps_around() {
        let years: Vec<i32> = (2000..2013).collect();
        let colors = ColorMap::new(&years, 1999);
        assert_eq!(colors.get(2011), Some(SAFE_PALETTE[0]));
        assert_eq!(colors.get(2012), Some(SAFE_PALETTE[1]));
    }

    #[test]
    fn unknown_year_gets_fallback() {
        let colors = ColorMap::new(&[2024], 2025);
        assert_eq!(colors.get_or_default(1990), FALLBACK_COLOR);
    }
}
