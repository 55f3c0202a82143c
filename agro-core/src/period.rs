//! Decade-of-month buckets and the month + decade period key used by the
//! rain-risk matrices.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AgroError;

/// One of three buckets per calendar month: days 1-10, 11-20, 21-end.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize)]
pub enum Decade {
    First,
    Second,
    Third,
}

impl Decade {
    pub fn from_day(day: u32) -> Decade {
        match day {
            0..=10 => Decade::First,
            11..=20 => Decade::Second,
            _ => Decade::Third,
        }
    }

    /// 1, 2 or 3.
    pub fn number(self) -> u8 {
        match self {
            Decade::First => 1,
            Decade::Second => 2,
            Decade::Third => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Decade> {
        match number {
            1 => Some(Decade::First),
            2 => Some(Decade::Second),
            3 => Some(Decade::Third),
            _ => None,
        }
    }
}

/// Month + decade key, displayed as `MM-D` (e.g. `06-2`).
///
/// Ordering is by month, then decade, which matches the lexical order of
/// the display form.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
pub struct Period {
    pub month: u32,
    pub decade: Decade,
}

impl Period {
    pub fn new(month: u32, decade: Decade) -> Period {
        Period { month, decade }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{}", self.month, self.decade.number())
    }
}

impl FromStr for Period {
    type Err = AgroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AgroError::InvalidFormat(format!("period '{}' is not MM-D", s));
        let (month, decade) = s.trim().split_once('-').ok_or_else(invalid)?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        let decade = decade
            .parse::<u8>()
            .ok()
            .and_then(Decade::from_number)
            .ok_or_else(invalid)?;
        Ok(Period { month, decade })
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decade_boundaries() {
        assert_eq!(Decade::from_day(1), Decade::First);
        assert_eq!(Decade::from_day(10), Decade::First);
        assert_eq!(Decade::from_day(11), Decade::Second);
        assert_eq!(Decade::from_day(20), Decade::Second);
        assert_eq!(Decade::from_day(21), Decade::Third);
        assert_eq!(Decade::from_day(31), Decade::Third);
    }

    #[test]
    fn period_display_is_zero_padded() {
        assert_eq!(Period::new(6, Decade::Second).to_string(), "06-2");
        assert_eq!(Period::new(11, Decade::Third).to_string(), "11-3");
    }

    #[test]
    fn period_parse() {
        let period: Period = "09-1".parse().unwrap();
        assert_eq!(period, Period::new(9, Decade::First));
        assert!("13-1".parse::<Period>().is_err());
        assert!("06-4".parse::<Period>().is_err());
        assert!("june".parse::<Period>().is_err());
    }

    #[test]
    fn period_order_matches_display_order() {
        let mut periods = vec![
            Period::new(10, Decade::First),
            Period::new(6, Decade::Third),
            Period::new(6, Decade::First),
            Period::new(9, Decade::Second),
        ];
        periods.sort();
        let labels: Vec<String> = periods.iter().map(|p| p.to_string()).collect();
        let mut sorted_labels = labels.clone();
        sorted_labels.sort();
        assert_eq!(labels, sorted_labels);
        assert_eq!(labels, vec!["06-1", "06-3", "09-2", "10-1"]);
    }

    #[test]
    fn period_serializes_as_string() {
        let json = serde_json::to_string(&Period::new(7, Decade::Third)).unwrap();
        assert_eq!(json, "\"07-3\"");
    }
}
