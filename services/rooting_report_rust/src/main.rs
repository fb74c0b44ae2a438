use anyhow::Result;
use chrono::Utc;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use podium_rooting_core::{catalog, engine, scoring};
use rooting_report_rust::config::Config;
use rooting_report_rust::{report, snapshot};

fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let snap = match &config.snapshot_path {
        Some(path) => {
            info!("loading snapshot from {path}");
            snapshot::load(path)?
        }
        None => {
            info!("no SNAPSHOT_PATH set; using the simulated mid-Games snapshot");
            snapshot::simulated()
        }
    };

    let now = config.reference_time.unwrap_or_else(Utc::now);
    let categories = catalog::build_catalog(&snap.events, &snap.propositions);
    info!(
        "{} categories, {} events, {} scraped results, {} predictions",
        categories.len(),
        snap.events.len(),
        snap.results.len(),
        snap.predictions.len()
    );

    let infos = engine::rooting_info_for_predictions(
        &categories,
        &snap.events,
        &snap.results,
        &snap.predictions,
        now,
        config.report_timezone,
    )?;
    info!("computed {} rooting entries", infos.len());

    let pool: Vec<(String, Vec<podium_rooting_core::models::Prediction>)> = snap
        .pool
        .iter()
        .map(|entry| (entry.user_name.clone(), entry.predictions.clone()))
        .collect();
    let scores = scoring::calculate_scores(&pool, &snap.official_results);

    print!(
        "{}",
        report::format_report(&snap.user_name, &infos, &scores, config.report_timezone)
    );

    Ok(())
}
