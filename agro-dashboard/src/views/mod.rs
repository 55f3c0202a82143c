//! Serializable page view models.
//!
//! A [`DashboardView`] is everything needed to draw the interface for one
//! session state; the UI layer turns it into HTML and chart calls.

pub mod analytics;
pub mod chart;
pub mod constructor;
pub mod precipitation;
pub mod tables;
pub mod temperature;

use agro_core::filter::{Choice, FilterState};
use agro_data::colors::ColorMap;
use agro_data::scale::ScaleSummary;
use agro_db::models::FilterOptions;
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::state::{Notice, Tab};

/// Shared inputs of the page renderers.
pub struct PageContext<'a> {
    pub colors: &'a ColorMap,
    pub config: &'a DashboardConfig,
}

/// Sidebar widgets: the options on offer and what each widget shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sidebar {
    pub options: FilterOptions,
    pub years: Vec<Choice<i32>>,
    pub clusters: Vec<Choice<String>>,
    pub blocks: Vec<Choice<String>>,
    pub cultures: Vec<Choice<String>>,
}

impl Sidebar {
    pub fn new(options: FilterOptions, filter: &FilterState) -> Self {
        Self {
            options,
            years: filter.years.to_widget(),
            clusters: filter.clusters.to_widget(),
            blocks: filter.blocks.to_widget(),
            cultures: filter.cultures.to_widget(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pages {
    pub temperature: temperature::TemperatureView,
    pub precipitation: precipitation::PrecipitationView,
    pub tables: tables::TablesView,
    pub constructor: constructor::ConstructorView,
    pub analytics: analytics::AnalyticsView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadyView {
    pub sidebar: Sidebar,
    pub ribbon: ScaleSummary,
    pub ribbon_tooltip: String,
    pub tab: Tab,
    pub colors: ColorMap,
    pub pages: Pages,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardView {
    /// Passphrase prompt.
    Locked { notice: Option<Notice> },
    /// The aggregated dataset could not be loaded; nothing else is shown.
    DataUnavailable { message: String },
    /// The filters matched no rows; only the sidebar is shown.
    NoData { sidebar: Sidebar, message: String },
    Ready(Box<ReadyView>),
}
