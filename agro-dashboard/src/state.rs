//! Session state and the event reducer.
//!
//! `SessionState` holds everything one user session has chosen: the
//! authentication flag, the sidebar filters, the active tab and the
//! per-page controls. [`SessionState::apply`] is the only way it changes;
//! rendering reads it and never writes.

use agro_core::filter::{Choice, FilterField, FilterState, Selection};
use agro_core::metric::Metric;
use serde::{Deserialize, Serialize};

use crate::auth::AuthGate;
use crate::config::DashboardConfig;
use agro_data::similarity::DEFAULT_SIMILARITY_METRICS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Temperature,
    Precipitation,
    Tables,
    Constructor,
    Analytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    WrongPassphrase,
    /// No passphrase is configured, so nothing can unlock the session.
    GateNotConfigured,
}

/// Metrics offered by the accumulation chart.
pub const ACCUMULATION_METRICS: [Metric; 3] = [Metric::SumTActive, Metric::SumTEff0, Metric::SumTEff10];

/// Metrics offered by the daily temperature chart.
pub const DAILY_TEMPERATURE_METRICS: [Metric; 3] = [Metric::Mean, Metric::Max, Metric::Min];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureControls {
    pub accumulation: Metric,
    pub daily: Metric,
}

impl Default for TemperatureControls {
    fn default() -> Self {
        Self {
            accumulation: Metric::SumTActive,
            daily: Metric::Mean,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationControls {
    /// Inclusive month range of the daily bars.
    pub months: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RightAxisStyle {
    Dashed,
    #[default]
    Bars,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorControls {
    /// Years compared on the dual-axis chart.
    pub years: Vec<i32>,
    /// Years the filter allowed when `years` was last reset, newest first.
    pub available: Vec<i32>,
    pub left: Metric,
    pub right: Metric,
    pub right_style: RightAxisStyle,
}

impl Default for ConstructorControls {
    fn default() -> Self {
        Self {
            years: Vec::new(),
            available: Vec::new(),
            left: Metric::ALL[0],
            right: Metric::ALL[4],
            right_style: RightAxisStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsControls {
    pub metrics: Vec<Metric>,
    /// Explicit reference year; `None` uses the etalon or newest year.
    pub reference: Option<i32>,
}

impl Default for AnalyticsControls {
    fn default() -> Self {
        Self {
            metrics: DEFAULT_SIMILARITY_METRICS.to_vec(),
            reference: None,
        }
    }
}

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Event {
    SubmitPassphrase(String),
    /// The full list a sidebar multiselect reports after a change, in pick
    /// order. Year values arrive as text.
    SelectFilter {
        field: FilterField,
        choices: Vec<Choice<String>>,
    },
    ResetFilters,
    SwitchTab(Tab),
    SetAccumulationMetric(Metric),
    SetDailyTemperatureMetric(Metric),
    SetPrecipitationMonths(u32, u32),
    SetConstructorYears(Vec<i32>),
    SetLeftAxis(Metric),
    SetRightAxis(Metric),
    SetRightAxisStyle(RightAxisStyle),
    /// Years present under the current filter, newest first.
    AvailableYearsChanged(Vec<i32>),
    SetSimilarityMetrics(Vec<Metric>),
    SetReferenceYear(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub authenticated: bool,
    pub notice: Option<Notice>,
    pub filter: FilterState,
    pub tab: Tab,
    pub temperature: TemperatureControls,
    pub precipitation: PrecipitationControls,
    pub constructor: ConstructorControls,
    pub analytics: AnalyticsControls,
}

fn parse_year_choices(choices: &[Choice<String>]) -> Vec<Choice<i32>> {
    choices
        .iter()
        .filter_map(|c| match c {
            Choice::All => Some(Choice::All),
            Choice::Value(v) => v.trim().parse().ok().map(Choice::Value),
        })
        .collect()
}

impl SessionState {
    /// A fresh, locked session.
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            authenticated: false,
            notice: None,
            filter: FilterState::default(),
            tab: Tab::default(),
            temperature: TemperatureControls::default(),
            precipitation: PrecipitationControls {
                months: config.precipitation_months,
            },
            constructor: ConstructorControls::default(),
            analytics: AnalyticsControls::default(),
        }
    }

    /// The state after `event`. While locked only a passphrase submission
    /// has any effect.
    pub fn apply(&self, event: &Event, gate: &AuthGate) -> SessionState {
        let mut next = self.clone();
        if !self.authenticated {
            if let Event::SubmitPassphrase(attempt) = event {
                if !gate.is_configured() {
                    next.notice = Some(Notice::GateNotConfigured);
                    log::error!("[Agro] session: no passphrase configured");
                } else if gate.check(attempt) {
                    next.authenticated = true;
                    next.notice = None;
                    log::info!("[Agro] session: unlocked");
                } else {
                    next.notice = Some(Notice::WrongPassphrase);
                    log::warn!("[Agro] session: wrong passphrase");
                }
            }
            return next;
        }

        match event {
            Event::SubmitPassphrase(_) => {}
            Event::SelectFilter { field, choices } => {
                let filter = &mut next.filter;
                match field {
                    FilterField::Year => {
                        filter.years = Selection::from_widget(&parse_year_choices(choices))
                    }
                    FilterField::Cluster => filter.clusters = Selection::from_widget(choices),
                    FilterField::Block => filter.blocks = Selection::from_widget(choices),
                    FilterField::Culture => filter.cultures = Selection::from_widget(choices),
                }
            }
            Event::ResetFilters => next.filter = self.filter.reset(),
            Event::SwitchTab(tab) => next.tab = *tab,
            Event::SetAccumulationMetric(metric) => {
                if ACCUMULATION_METRICS.contains(metric) {
                    next.temperature.accumulation = *metric;
                }
            }
            Event::SetDailyTemperatureMetric(metric) => {
                if DAILY_TEMPERATURE_METRICS.contains(metric) {
                    next.temperature.daily = *metric;
                }
            }
            Event::SetPrecipitationMonths(first, last) => {
                let first = (*first).clamp(1, 12);
                let last = (*last).clamp(1, 12);
                next.precipitation.months = (first.min(last), first.max(last));
            }
            Event::SetConstructorYears(years) => {
                let mut selected: Vec<i32> = Vec::with_capacity(years.len());
                for &year in years {
                    if next.constructor.available.contains(&year) && !selected.contains(&year) {
                        selected.push(year);
                    }
                }
                next.constructor.years = selected;
            }
            Event::SetLeftAxis(metric) => next.constructor.left = *metric,
            Event::SetRightAxis(metric) => next.constructor.right = *metric,
            Event::SetRightAxisStyle(style) => next.constructor.right_style = *style,
            Event::AvailableYearsChanged(years) => {
                if next.constructor.available != *years {
                    next.constructor.years = years.iter().copied().max().into_iter().collect();
                    next.constructor.available = years.clone();
                }
            }
            Event::SetSimilarityMetrics(metrics) => next.analytics.metrics = metrics.clone(),
            Event::SetReferenceYear(year) => next.analytics.reference = Some(*year),
        }
        next
    }
}
