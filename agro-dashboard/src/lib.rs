//! Session state, page view models and CSV exports for the agro climate
//! dashboard.
//!
//! This crate provides:
//! - `state`: `SessionState` and the `apply` reducer over user events
//! - `auth`: the shared-passphrase gate
//! - `config`: `DashboardConfig`
//! - `views`: serializable page view models (charts, tables, heatmaps)
//! - `export`: the two CSV downloads
//! - `dashboard`: `Dashboard`, which loads the data and renders a state

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod state;
pub mod views;

pub use dashboard::Dashboard;
