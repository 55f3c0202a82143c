//! Agro CLI - headless access to the agro climate dashboard.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "agro-cli",
    version,
    about = "Agro climate dashboard: reports, analytics and exports"
)]
struct Cli {
    #[command(flatten)]
    dataset: agro_cmd::DatasetArgs,

    #[command(subcommand)]
    command: agro_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[Agro] cli: data {:?}", cli.dataset.data);
    agro_cmd::run(cli.dataset, cli.command)
}
