//! Rain-risk heatmaps: four year x period matrices over daily precipitation.

use agro_core::error::{AgroError, Result};
use agro_core::metric::Metric;
use agro_core::period::Period;
use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::YearlyAggregate;

/// Daily precipitation above this counts as a heavy-rain day.
pub const HEAVY_RAIN_THRESHOLD_MM: f64 = 3.0;

/// Dense year x period table. Every year has a cell for every period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix<T> {
    pub years: Vec<i32>,
    pub periods: Vec<Period>,
    /// `cells[y][p]` for `years[y]` and `periods[p]`.
    pub cells: Vec<Vec<T>>,
}

impl<T: Copy> Matrix<T> {
    pub fn get(&self, year: i32, period: Period) -> Option<T> {
        let y = self.years.iter().position(|&v| v == year)?;
        let p = self.periods.iter().position(|&v| v == period)?;
        Some(self.cells[y][p])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainRiskMatrices {
    pub threshold_mm: f64,
    pub total_precipitation: Matrix<f64>,
    pub heavy_rain_days: Matrix<u32>,
    pub rainy_days: Matrix<u32>,
    pub longest_rainy_streak: Matrix<u32>,
}

#[derive(Debug, Default)]
struct CellAcc {
    total: f64,
    heavy: u32,
    rainy: u32,
    // rainy flag per row, in date order
    flags: Vec<bool>,
}

/// Longest run of consecutive `true` values; 0 when there is none.
pub fn longest_true_run(flags: impl IntoIterator<Item = bool>) -> u32 {
    let runs = flags.into_iter().chunk_by(|&rainy| rainy);
    let longest = runs
        .into_iter()
        .filter(|(rainy, _)| *rainy)
        .map(|(_, run)| run.count() as u32)
        .max()
        .unwrap_or(0);
    longest
}

fn matrix<T: Copy + Default>(
    years: &[i32],
    periods: &[Period],
    groups: &BTreeMap<(i32, Period), CellAcc>,
    cell: impl Fn(&CellAcc) -> T,
) -> Matrix<T> {
    let cells = years
        .iter()
        .map(|&year| {
            periods
                .iter()
                .map(|&period| groups.get(&(year, period)).map(&cell).unwrap_or_default())
                .collect()
        })
        .collect();
    Matrix {
        years: years.to_vec(),
        periods: periods.to_vec(),
        cells,
    }
}

/// Build the four matrices from the yearly aggregate.
///
/// Rows are consumed in the aggregate's (year, plot date) order, which is
/// what the streak statistic relies on. Rows without a precipitation value
/// count as dry.
pub fn rain_risk(aggregate: &YearlyAggregate, threshold_mm: f64) -> Result<RainRiskMatrices> {
    if !aggregate.available.contains(Metric::Precipitation) {
        return Err(AgroError::RainRiskUnavailable);
    }

    let mut groups: BTreeMap<(i32, Period), CellAcc> = BTreeMap::new();
    let mut periods: BTreeSet<Period> = BTreeSet::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();
    for row in &aggregate.rows {
        let period = row.period();
        periods.insert(period);
        years.insert(row.year);
        let mm = row.value(Metric::Precipitation).unwrap_or(0.0);
        let acc = groups.entry((row.year, period)).or_default();
        acc.total += mm;
        if mm > threshold_mm {
            acc.heavy += 1;
        }
        if mm > 0.0 {
            acc.rainy += 1;
        }
        acc.flags.push(mm > 0.0);
    }

    let years: Vec<i32> = years.into_iter().collect();
    let periods: Vec<Period> = periods.into_iter().collect();
    let matrices = RainRiskMatrices {
        threshold_mm,
        total_precipitation: matrix(&years, &periods, &groups, |acc| acc.total),
        heavy_rain_days: matrix(&years, &periods, &groups, |acc| acc.heavy),
        rainy_days: matrix(&years, &periods, &groups, |acc| acc.rainy),
        longest_rainy_streak: matrix(&years, &periods, &groups, |acc| {
            longest_true_run(acc.flags.iter().copied())
        }),
    };
    log::debug!(
        "[Agro] rain_risk: {} years x {} periods",
        years.len(),
        periods.len()
    );
    Ok(matrices)
}
