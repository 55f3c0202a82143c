//! Command implementations for the agro dashboard CLI.
//!
//! Every subcommand opens the configured datasets, replays the filter and
//! passphrase options as session events, and prints one projection of the
//! rendered dashboard.

use agro_core::metric::Metric;
use clap::{Args, Subcommand};
use std::path::PathBuf;

pub mod export;
pub mod report;
pub mod session;

/// Dataset, gate and filter options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Aggregated dataset shards (CSV, optionally gzipped), comma separated or repeated
    #[arg(long = "data", env = "AGRO_DATA", value_delimiter = ',', global = true)]
    pub data: Vec<PathBuf>,

    /// Field-level summary CSV
    #[arg(long, env = "AGRO_FIELDS", global = true)]
    pub fields: Option<PathBuf>,

    /// Etalon (reference) year
    #[arg(long, env = "AGRO_ETALON_YEAR", global = true)]
    pub etalon: Option<i32>,

    /// Configured dashboard passphrase (the gate's secret)
    #[arg(long, env = "AGRO_PASSWORD", hide_env_values = true, global = true)]
    pub passphrase: Option<String>,

    /// Passphrase entered to unlock the session
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Restrict to these years (repeatable; default all)
    #[arg(long = "year", global = true)]
    pub years: Vec<i32>,

    /// Restrict to these clusters (repeatable; default all)
    #[arg(long = "cluster", global = true)]
    pub clusters: Vec<String>,

    /// Restrict to these blocks (repeatable; default all)
    #[arg(long = "block", global = true)]
    pub blocks: Vec<String>,

    /// Restrict to these crops (repeatable; default all)
    #[arg(long = "culture", global = true)]
    pub cultures: Vec<String>,
}

fn parse_metric(id: &str) -> Result<Metric, String> {
    Metric::from_id(id).ok_or_else(|| {
        let known: Vec<&str> = Metric::ALL.iter().map(|m| m.id()).collect();
        format!("unknown metric '{}', expected one of: {}", id, known.join(", "))
    })
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the status ribbon and the filter options
    Summary,

    /// Score every year's climate similarity to a reference year
    Similarity {
        /// Reference year (default: etalon year if present, else the newest)
        #[arg(short, long)]
        reference: Option<i32>,

        /// Metric identifier to compare (repeatable; default Sum_T_active and Sum_Precipitation)
        #[arg(short, long = "metric", value_parser = parse_metric)]
        metrics: Vec<Metric>,
    },

    /// Print the rain-risk matrices per year and ten-day period
    RainRisk,

    /// Write the aggregated report CSV
    ExportAggregated {
        /// Output CSV path
        #[arg(short, long, default_value = agro_dashboard::export::AGGREGATED_FILE_NAME)]
        output: PathBuf,
    },

    /// Write the field summary CSV (UTF-8 with BOM)
    ExportFields {
        /// Output CSV path
        #[arg(short, long, default_value = agro_dashboard::export::FIELDS_FILE_NAME)]
        output: PathBuf,
    },

    /// Print the full dashboard view as JSON
    Render {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

pub fn run(dataset: DatasetArgs, command: Command) -> anyhow::Result<()> {
    let session = session::Session::open(&dataset)?;
    match command {
        Command::Summary => report::run_summary(&session),
        Command::Similarity { reference, metrics } => {
            report::run_similarity(&session, reference, metrics)
        }
        Command::RainRisk => report::run_rain_risk(&session),
        Command::ExportAggregated { output } => export::run_export_aggregated(&session, &output),
        Command::ExportFields { output } => export::run_export_fields(&session, &output),
        Command::Render { pretty } => export::run_render(&session, pretty),
    }
}
