//! File exports and the JSON view dump.

use anyhow::Context;
use std::fs;
use std::path::Path;

use crate::session::Session;

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("[Agro] cmd: wrote {} bytes to {}", bytes.len(), path.display());
    println!("Saved {}", path.display());
    Ok(())
}

pub fn run_export_aggregated(session: &Session, output: &Path) -> anyhow::Result<()> {
    match session.dashboard.export_aggregated(&session.state) {
        Ok(bytes) => write_output(output, &bytes),
        Err(e) => {
            eprintln!("Nothing exported: {}", e);
            Ok(())
        }
    }
}

pub fn run_export_fields(session: &Session, output: &Path) -> anyhow::Result<()> {
    match session.dashboard.export_fields(&session.state) {
        Ok(Some(bytes)) => write_output(output, &bytes),
        Ok(None) => {
            eprintln!("Nothing exported: no field summary rows match the current filters");
            Ok(())
        }
        Err(e) => {
            eprintln!("Nothing exported: {}", e);
            Ok(())
        }
    }
}

pub fn run_render(session: &Session, pretty: bool) -> anyhow::Result<()> {
    let view = session.dashboard.render(&session.state);
    let json = if pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    println!("{}", json);
    Ok(())
}
