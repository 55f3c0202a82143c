//! Plain-text reports printed to stdout.

use agro_core::metric::Metric;
use agro_dashboard::state::{Event, Notice};
use agro_dashboard::views::analytics::{RainRiskView, SimilarityView};
use agro_dashboard::views::{DashboardView, ReadyView};
use agro_data::rain_risk::Matrix;
use std::fmt::Display;

use crate::session::Session;

/// The ready view, or `None` after printing why the dashboard has none.
fn ready_or_report(view: DashboardView) -> Option<Box<ReadyView>> {
    match view {
        DashboardView::Ready(ready) => Some(ready),
        DashboardView::Locked { notice } => {
            match notice {
                Some(Notice::WrongPassphrase) => eprintln!("Wrong password"),
                Some(Notice::GateNotConfigured) => {
                    eprintln!("No dashboard passphrase configured; set AGRO_PASSWORD or --passphrase")
                }
                None => eprintln!("The dashboard is password protected; pass --password"),
            }
            None
        }
        DashboardView::DataUnavailable { message } => {
            eprintln!("Data unavailable: {}", message);
            None
        }
        DashboardView::NoData { message, .. } => {
            eprintln!("{}", message);
            None
        }
    }
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn run_summary(session: &Session) -> anyhow::Result<()> {
    let Some(ready) = ready_or_report(session.dashboard.render(&session.state)) else {
        return Ok(());
    };
    let ribbon = &ready.ribbon;
    println!("Locations:    {}", ribbon.total_scale);
    println!("              {}", ready.ribbon_tooltip);
    println!("Etalon year:  {}", ribbon.etalon_year);
    println!("Clusters:     {}", ribbon.clusters);
    println!("Blocks:       {}", ribbon.blocks);
    println!("Cultures:     {}", ribbon.cultures);
    println!();
    let options = &ready.sidebar.options;
    println!("Available years:    {}", join(&options.years));
    println!("Available clusters: {}", join(&options.clusters));
    println!("Available blocks:   {}", join(&options.blocks));
    println!("Available cultures: {}", join(&options.cultures));
    Ok(())
}

pub fn run_similarity(
    session: &Session,
    reference: Option<i32>,
    metrics: Vec<Metric>,
) -> anyhow::Result<()> {
    let mut state = session.state.clone();
    if let Some(year) = reference {
        state = session.dashboard.dispatch(&state, &Event::SetReferenceYear(year));
    }
    if !metrics.is_empty() {
        state = session
            .dashboard
            .dispatch(&state, &Event::SetSimilarityMetrics(metrics));
    }
    let Some(ready) = ready_or_report(session.dashboard.render(&state)) else {
        return Ok(());
    };

    match &ready.pages.analytics.similarity {
        SimilarityView::Ready {
            reference,
            labels,
            rows,
        } => {
            println!("Similarity to {}", reference);
            print!("{:<6} {:>9}", "Year", "Score, %");
            for label in labels {
                print!("  {:>28}", label);
            }
            println!();
            let metrics = &state.analytics.metrics;
            for row in rows {
                print!("{:<6} {:>9.2}", row.year, row.score);
                for metric in metrics {
                    match row.values.get(*metric) {
                        Some(value) => print!("  {:>28.1}", value),
                        None => print!("  {:>28}", "-"),
                    }
                }
                println!();
            }
        }
        SimilarityView::SelectMetrics { message } | SimilarityView::NoResult { message, .. } => {
            eprintln!("{}", message);
        }
    }
    Ok(())
}

fn print_matrix<T: Display>(title: &str, matrix: &Matrix<T>) {
    println!("{}", title);
    print!("{:<6}", "Year");
    for period in &matrix.periods {
        print!(" {:>6}", period.to_string());
    }
    println!();
    for (year, row) in matrix.years.iter().zip(&matrix.cells) {
        print!("{:<6}", year);
        for cell in row {
            print!(" {:>6}", cell.to_string());
        }
        println!();
    }
    println!();
}

pub fn run_rain_risk(session: &Session) -> anyhow::Result<()> {
    let Some(ready) = ready_or_report(session.dashboard.render(&session.state)) else {
        return Ok(());
    };
    match &ready.pages.analytics.rain_risk {
        RainRiskView::Ready(matrices) => {
            let totals = Matrix {
                years: matrices.total_precipitation.years.clone(),
                periods: matrices.total_precipitation.periods.clone(),
                cells: matrices
                    .total_precipitation
                    .cells
                    .iter()
                    .map(|row| row.iter().map(|mm| format!("{:.1}", mm)).collect())
                    .collect(),
            };
            print_matrix("Total precipitation, mm", &totals);
            print_matrix(
                &format!("Heavy rain days (> {} mm)", matrices.threshold_mm),
                &matrices.heavy_rain_days,
            );
            print_matrix("Rainy days (> 0 mm)", &matrices.rainy_days);
            print_matrix("Longest rainy streak, days", &matrices.longest_rainy_streak);
        }
        RainRiskView::Unavailable { message } => eprintln!("{}", message),
    }
    Ok(())
}
