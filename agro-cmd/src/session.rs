//! Building a dashboard session from command-line options.

use agro_core::filter::{Choice, FilterField};
use agro_dashboard::config::DashboardConfig;
use agro_dashboard::state::{Event, SessionState};
use agro_dashboard::Dashboard;

use crate::DatasetArgs;

pub struct Session {
    pub dashboard: Dashboard,
    pub state: SessionState,
}

/// Dashboard configuration from the CLI options; unset options keep the
/// defaults.
pub fn config_from_args(args: &DatasetArgs) -> DashboardConfig {
    let defaults = DashboardConfig::default();
    DashboardConfig {
        data_paths: if args.data.is_empty() {
            defaults.data_paths.clone()
        } else {
            args.data.clone()
        },
        fields_path: args.fields.clone(),
        etalon_year: args.etalon.unwrap_or(defaults.etalon_year),
        passphrase: args.passphrase.clone(),
        ..defaults
    }
}

/// Session events equivalent to the CLI options: the passphrase first,
/// then one multiselect change per restricted filter.
pub fn events_from_args(args: &DatasetArgs) -> Vec<Event> {
    let mut events = Vec::new();
    if let Some(password) = &args.password {
        events.push(Event::SubmitPassphrase(password.clone()));
    }
    let filters = [
        (FilterField::Year, args.years.iter().map(|y| y.to_string()).collect::<Vec<_>>()),
        (FilterField::Cluster, args.clusters.clone()),
        (FilterField::Block, args.blocks.clone()),
        (FilterField::Culture, args.cultures.clone()),
    ];
    for (field, values) in filters {
        if !values.is_empty() {
            events.push(Event::SelectFilter {
                field,
                choices: values.into_iter().map(Choice::Value).collect(),
            });
        }
    }
    events
}

impl Session {
    pub fn open(args: &DatasetArgs) -> anyhow::Result<Self> {
        let dashboard = Dashboard::open(config_from_args(args))?;
        let state = events_from_args(args)
            .iter()
            .fold(dashboard.new_session(), |state, event| dashboard.dispatch(&state, event));
        log::debug!("[Agro] cmd: session state {:?}", state.filter);
        Ok(Session { dashboard, state })
    }
}
