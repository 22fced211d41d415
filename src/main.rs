//! launchmap: rocket-launch schedule aggregation pipeline.
//!
//! Single-binary Tokio application that:
//! 1. Fetches past + upcoming launches from the configured providers
//! 2. Resolves launch locations to coordinates through the durable place cache
//! 3. Aggregates the records and annotates per-location density
//! 4. Renders the requested view (full, date-ranged, marker-selected)

mod config;

use std::path::Path;

use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing::{error, info, warn};

use common::config::LaunchmapConfig;
use common::{Error, LaunchDataset, LaunchRecord, LaunchTime, Result};
use geocode_client::GeocodeClient;
use launchlib_client::LaunchLibClient;
use pipeline::{
    aggregate, filter_by_range, resolve_coordinates, select_by_coordinate, select_in_range_at,
    PlaceCache,
};
use sfi_client::CalendarClient;

/// Rocket launch schedule aggregator
#[derive(Parser)]
#[command(name = "launchmap", about = "Rocket launch schedule aggregator")]
struct Cli {
    /// Start of the date range, YYYY-MM-DD (requires --to).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the date range, YYYY-MM-DD (requires --from).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Only launches at this exact latitude (map marker selection).
    #[arg(long)]
    lat: Option<f64>,

    /// Emit the selected view as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "launchmap=info,sfi_client=info,launchlib_client=info,geocode_client=info,pipeline=info"
                    .into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &cfg).await {
        error!("Pipeline failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, cfg: &LaunchmapConfig) -> Result<()> {
    let (past, future) = fetch_all(cfg).await;
    info!(
        "Fetched {} past and {} upcoming raw records",
        past.len(),
        future.len()
    );

    let (past, future) = resolve_all(cfg, past, future).await;

    if let Some(next) = future.first() {
        info!("Next launch: {} — {}", next.mission, describe_countdown(next));
    }

    let dataset = aggregate(past, future);
    info!(
        "Aggregated {} launches across {} map markers",
        dataset.len(),
        dataset.markers().len()
    );

    let view = select_view(cli, &dataset)?;
    render(&view, cli.json)?;
    Ok(())
}

/// Fetch past + upcoming records from every enabled provider.
///
/// A failing provider degrades to an empty contribution; total failure
/// yields an empty dataset rather than an error.
async fn fetch_all(cfg: &LaunchmapConfig) -> (Vec<LaunchRecord>, Vec<LaunchRecord>) {
    let mut past = Vec::new();
    let mut future = Vec::new();

    if cfg.sources.calendar {
        let calendar = CalendarClient::new(cfg.calendar_url.clone(), cfg.http_timeout_secs);
        for (is_past, bucket) in [(true, &mut past), (false, &mut future)] {
            match calendar.fetch_launches(is_past).await {
                Ok(records) => bucket.extend(records),
                Err(e) => warn!("Calendar source failed (past={}): {}", is_past, e),
            }
        }
    }

    if cfg.sources.launchlib {
        let listing = LaunchLibClient::new(cfg.launchlib_url.clone(), cfg.http_timeout_secs);
        for (is_past, bucket) in [(true, &mut past), (false, &mut future)] {
            match listing.fetch_launches(is_past).await {
                Ok(records) => bucket.extend(records),
                Err(e) => warn!("Launch listing source failed (past={}): {}", is_past, e),
            }
        }
    }

    (past, future)
}

/// One resolution pass over both record sets, then a single cache flush.
async fn resolve_all(
    cfg: &LaunchmapConfig,
    mut past: Vec<LaunchRecord>,
    mut future: Vec<LaunchRecord>,
) -> (Vec<LaunchRecord>, Vec<LaunchRecord>) {
    let cache_path = Path::new(&cfg.places_path);
    let mut cache = match PlaceCache::load(cache_path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Place cache unreadable ({}); starting empty", e);
            PlaceCache::default()
        }
    };

    let geocoder = GeocodeClient::new(cfg.geocode_api_key.clone(), cfg.http_timeout_secs);
    // Both sets share one pass so an unresolvable place name present in
    // past and future still triggers only one external lookup.
    resolve_coordinates(
        past.iter_mut().chain(future.iter_mut()),
        &mut cache,
        &geocoder,
    )
    .await;

    // In-memory resolutions stay applied even if the flush fails.
    if cache.is_dirty() {
        if let Err(e) = cache.flush(cache_path) {
            warn!("{}; resolved coordinates kept in memory only", e);
        }
    }

    (past, future)
}

fn select_view(cli: &Cli, dataset: &LaunchDataset) -> Result<LaunchDataset> {
    match (cli.from, cli.to, cli.lat) {
        (Some(from), Some(to), Some(lat)) => Ok(select_in_range_at(dataset, from, to, lat)),
        (Some(from), Some(to), None) => Ok(filter_by_range(dataset, from, to)),
        (None, None, Some(lat)) => Ok(select_by_coordinate(dataset, lat)),
        (None, None, None) => Ok(dataset.clone()),
        _ => Err(Error::Config(
            "--from and --to must be given together".into(),
        )),
    }
}

fn render(view: &LaunchDataset, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    for rec in &view.records {
        println!(
            "{:<40} {:<22} {:<30} pad {:<8} {} (density {})",
            rec.mission, rec.time, rec.location, rec.pad, rec.vehicle, rec.density
        );
    }
    println!("{} launches", view.len());
    Ok(())
}

/// Human countdown to an upcoming launch; `TBD` stays `TBD`.
fn describe_countdown(next: &LaunchRecord) -> String {
    match next.launch_time() {
        Ok(LaunchTime::At(t)) => {
            let diff = t - Utc::now().naive_utc();
            if diff > chrono::Duration::zero() {
                format!(
                    "in {} days {} hours {} minutes",
                    diff.num_days(),
                    diff.num_hours() % 24,
                    diff.num_minutes() % 60
                )
            } else {
                format!("at {}", next.time)
            }
        }
        _ => "TBD".to_string(),
    }
}
