//! The dashboard: loaded data plus the pure `render` projection.

use agro_core::error::AgroError;
use agro_core::filter::FilterState;
use agro_core::metric::MetricSet;
use agro_core::record::DailyRecord;
use agro_data::aggregate::YearlyAggregate;
use agro_data::colors::ColorMap;
use agro_data::field_summary::FieldSummary;
use agro_data::scale::ScaleSummary;
use agro_db::models::FilterOptions;
use agro_db::Database;
use std::path::Path;

use crate::auth::AuthGate;
use crate::config::DashboardConfig;
use crate::export;
use crate::state::{Event, SessionState};
use crate::views::tables::{AggregatedTable, FieldsView, TablesView};
use crate::views::{
    analytics, constructor, precipitation, temperature, DashboardView, PageContext, Pages, ReadyView,
    Sidebar,
};

/// Everything derived from one filter state.
struct Snapshot {
    options: FilterOptions,
    records: Vec<DailyRecord>,
    aggregate: YearlyAggregate,
    selected_years: Vec<i32>,
}

pub struct Dashboard {
    db: Database,
    config: DashboardConfig,
    gate: AuthGate,
    fields: Option<FieldSummary>,
    /// Set when the aggregated dataset failed to load.
    load_error: Option<String>,
    available: MetricSet,
    colors: ColorMap,
}

fn read_field_summary(path: &Path) -> agro_core::error::Result<FieldSummary> {
    let text = std::fs::read_to_string(path).map_err(|e| AgroError::DataUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    FieldSummary::from_csv(&text)
}

impl Dashboard {
    /// Load the configured datasets. A missing aggregated dataset does not
    /// fail here; it turns every render into [`DashboardView::DataUnavailable`].
    pub fn open(config: DashboardConfig) -> anyhow::Result<Self> {
        if config.passphrase.as_deref().map_or(true, str::is_empty) {
            log::warn!("[Agro] dashboard: no passphrase configured; sessions cannot be unlocked");
        }
        let db = Database::new()?;
        let load_error = match db.load_shards(config.data_paths.as_slice()) {
            Ok(_) => None,
            Err(e) => {
                log::error!("[Agro] dashboard: {}", e);
                Some(e.to_string())
            }
        };
        let fields = match config.fields_path.as_deref() {
            None => None,
            Some(path) => match read_field_summary(path) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    log::warn!("[Agro] dashboard: field summary not loaded: {}", e);
                    None
                }
            },
        };
        let mut dashboard = Self::from_database(db, config, fields)?;
        dashboard.load_error = load_error;
        Ok(dashboard)
    }

    /// Wrap an already populated database.
    pub fn from_database(
        db: Database,
        config: DashboardConfig,
        fields: Option<FieldSummary>,
    ) -> anyhow::Result<Self> {
        let available = db.available_metrics()?;
        let colors = ColorMap::new(&db.query_years()?, config.etalon_year);
        Ok(Self {
            gate: AuthGate::new(config.passphrase.clone()),
            db,
            config,
            fields,
            load_error: None,
            available,
            colors,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn new_session(&self) -> SessionState {
        self.sync_available_years(SessionState::new(&self.config))
    }

    /// Apply `event`, then let the constructor follow the years the new
    /// filter leaves available.
    pub fn dispatch(&self, state: &SessionState, event: &Event) -> SessionState {
        self.sync_available_years(state.apply(event, &self.gate))
    }

    fn sync_available_years(&self, state: SessionState) -> SessionState {
        if !state.authenticated || self.load_error.is_some() {
            return state;
        }
        match self.snapshot(&state.filter) {
            Ok(snapshot) => {
                let mut years = snapshot.aggregate.years();
                years.reverse();
                state.apply(&Event::AvailableYearsChanged(years), &self.gate)
            }
            Err(e) => {
                log::error!("[Agro] dashboard: {}", e);
                state
            }
        }
    }

    fn snapshot(&self, filter: &FilterState) -> anyhow::Result<Snapshot> {
        let options = self.db.query_filter_options(filter)?;
        let records = self.db.query_records(filter)?;
        let aggregate = YearlyAggregate::from_records(&records, self.available);
        let selected_years = filter.years.resolve(&options.years);
        Ok(Snapshot {
            options,
            records,
            aggregate,
            selected_years,
        })
    }

    /// Project `state` onto a view. Never fails: every error becomes a
    /// view state.
    pub fn render(&self, state: &SessionState) -> DashboardView {
        if !state.authenticated {
            return DashboardView::Locked {
                notice: state.notice,
            };
        }
        if let Some(message) = &self.load_error {
            return DashboardView::DataUnavailable {
                message: message.clone(),
            };
        }
        let snapshot = match self.snapshot(&state.filter) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("[Agro] dashboard: query failed: {}", e);
                return DashboardView::DataUnavailable {
                    message: e.to_string(),
                };
            }
        };
        let sidebar = Sidebar::new(snapshot.options.clone(), &state.filter);
        if snapshot.aggregate.is_empty() {
            return DashboardView::NoData {
                sidebar,
                message: AgroError::EmptyFilterResult.to_string(),
            };
        }

        let ctx = PageContext {
            colors: &self.colors,
            config: &self.config,
        };
        let aggregate = &snapshot.aggregate;
        let ribbon = ScaleSummary::new(
            &snapshot.records,
            &state.filter,
            &snapshot.selected_years,
            self.config.etalon_year,
        );
        let pages = Pages {
            temperature: temperature::render(aggregate, &state.temperature, &ctx),
            precipitation: precipitation::render(aggregate, &state.precipitation, &ctx),
            tables: TablesView {
                aggregated: AggregatedTable::new(aggregate, &state.filter),
                fields: FieldsView::new(self.fields.as_ref(), &state.filter, &snapshot.selected_years),
            },
            constructor: constructor::render(aggregate, &state.constructor, &ctx),
            analytics: analytics::render(aggregate, &state.analytics, &ctx),
        };
        DashboardView::Ready(Box::new(ReadyView {
            sidebar,
            ribbon_tooltip: ribbon.tooltip(),
            ribbon,
            tab: state.tab,
            colors: self.colors.clone(),
            pages,
        }))
    }

    fn ensure_ready(&self, state: &SessionState) -> anyhow::Result<()> {
        if !state.authenticated {
            anyhow::bail!("session is locked");
        }
        if let Some(message) = &self.load_error {
            anyhow::bail!("{}", message);
        }
        Ok(())
    }

    /// The aggregated report for the current selection.
    pub fn export_aggregated(&self, state: &SessionState) -> anyhow::Result<Vec<u8>> {
        self.ensure_ready(state)?;
        let snapshot = self.snapshot(&state.filter)?;
        if snapshot.aggregate.is_empty() {
            return Err(AgroError::EmptyFilterResult.into());
        }
        export::aggregated_csv(&AggregatedTable::new(&snapshot.aggregate, &state.filter))
    }

    /// The field summary for the current selection; `None` when no summary
    /// is loaded or nothing matches.
    pub fn export_fields(&self, state: &SessionState) -> anyhow::Result<Option<Vec<u8>>> {
        self.ensure_ready(state)?;
        let options = self.db.query_filter_options(&state.filter)?;
        let selected_years = state.filter.years.resolve(&options.years);
        match FieldsView::new(self.fields.as_ref(), &state.filter, &selected_years) {
            FieldsView::Table { summary, .. } => Ok(Some(export::fields_csv(&summary)?)),
            FieldsView::NotLoaded | FieldsView::NothingFound => Ok(None),
        }
    }
}
