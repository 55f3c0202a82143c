//! Dual-axis constructor helpers.

use agro_core::metric::Metric;
use serde::Serialize;

use crate::aggregate::YearlyAggregate;

/// Headroom above the series maximum.
const HEADROOM: f64 = 1.1;

/// Y-axis range for a dual-axis chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

/// Observed extent of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Extent> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Extent { min: v, max: v }),
            Some(e) => Some(Extent {
                min: e.min.min(v),
                max: e.max.max(v),
            }),
        })
    }

    fn ratio(&self) -> f64 {
        if self.max != 0.0 {
            self.min / self.max
        } else {
            0.0
        }
    }
}

/// Range for `axis` so that its zero line aligns with `other`'s.
///
/// When both series are non-negative the axis starts at 0. Otherwise the
/// more negative min/max ratio of the two is applied to this axis' maximum.
pub fn synced_range(axis: Extent, other: Extent) -> AxisRange {
    if axis.min >= 0.0 && other.min >= 0.0 {
        return AxisRange {
            min: 0.0,
            max: axis.max * HEADROOM,
        };
    }
    let ratio = axis.ratio().min(other.ratio());
    AxisRange {
        min: axis.max * ratio,
        max: axis.max * HEADROOM,
    }
}

/// Left and right axis ranges over the selected years.
///
/// `None` when either metric has no value in the selection.
pub fn dual_axis_ranges(
    aggregate: &YearlyAggregate,
    years: &[i32],
    left: Metric,
    right: Metric,
) -> Option<(AxisRange, AxisRange)> {
    let selected = || aggregate.rows.iter().filter(|r| years.contains(&r.year));
    let left_extent = Extent::of(selected().filter_map(|r| r.value(left)))?;
    let right_extent = Extent::of(selected().filter_map(|r| r.value(right)))?;
    Some((
        synced_range(left_extent, right_extent),
        synced_range(right_extent, left_extent),
    ))
}
