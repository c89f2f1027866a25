/// Runs one batch refresh of the resort catalog against the live
/// providers and prints each resort's status for today.
use std::error::Error;
use std::sync::Arc;

use chrono::Local;
use tracing::info;

use schuss_service::config::ServiceConfig;
use schuss_service::ingest::sources::LiveSources;
use schuss_service::orchestrator::{BatchEvent, BatchOrchestrator};
use schuss_service::resorts;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServiceConfig::from_env()?;
    config.logging.init();

    let catalog = match &config.catalog_path {
        Some(path) => resorts::load_catalog(path)?,
        None => resorts::default_catalog()?,
    };
    info!(resorts = catalog.len(), "Catalog loaded");

    let sources = Arc::new(LiveSources::new(config.sources.clone()));
    let orchestrator = Arc::new(BatchOrchestrator::new(sources, &config.batch));
    let (handle, mut events) = orchestrator.spawn(catalog.clone());

    while let Some(event) = events.recv().await {
        if let BatchEvent::ResortCompleted { slug, reading, pending, .. } = &event {
            info!(resort = %slug, fused = reading.is_some(), pending, "Resort refreshed");
        }
    }
    let snapshot = handle.await?;

    let today = Local::now().date_naive();
    println!(
        "{:<20} {:>8} {:>7} {:>7} {:>7} {:>8} {:>7}",
        "resort", "status", "temp", "snow", "wind", "reliab.", "danger"
    );
    for resort in &catalog {
        let assessment = snapshot.assess(resort, today);
        let danger = snapshot
            .bulletin_for(resort)
            .map(|b| b.level.to_string())
            .unwrap_or_else(|| "-".into());
        let status = assessment.status.to_string();
        match snapshot.reading(&resort.slug) {
            Some(r) => println!(
                "{:<20} {:>8} {:>5}°C {:>4}cm {:>2}km/h {:>8} {:>7}",
                resort.slug,
                status,
                r.temperature_c,
                r.snow_depth_cm,
                r.wind_kmh,
                format!("{:?}", r.reliability),
                danger
            ),
            None => println!(
                "{:<20} {:>8} {:>7} {:>7} {:>7} {:>8} {:>7}",
                resort.slug, status, "-", "-", "-", "-", danger
            ),
        }
    }

    Ok(())
}
