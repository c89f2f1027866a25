//! Batch refresh of the whole resort catalog.
//!
//! One call to `BatchOrchestrator::run` is one batch cycle. The catalog is
//! split into fixed-size groups that run strictly one after another, with
//! a pause between groups to stay under the upstream rate limits. Inside a
//! group every resort runs as its own task: source fan-out, fusion and the
//! avalanche bulletin lookup all overlap.
//!
//! Results are published per resort as they complete, over an optional
//! event channel, and accumulated into a `BatchSnapshot` returned to the
//! caller. A resort whose sources all fail, or whose task panics, simply
//! has no reading; it never affects another resort or the batch.
//!
//! `ForecastLookup` is the on-demand 7-day forecast for a single opened
//! resort, cancelled whenever another resort is selected.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info};

use crate::alert::status::{self, StatusAssessment};
use crate::config::BatchConfig;
use crate::fusion;
use crate::ingest::open_meteo::ForecastDay;
use crate::ingest::sources::{ForecastSource, ResortSources};
use crate::logging::{self, DataSource};
use crate::model::{AvalancheBulletin, CompositeReading};
use crate::resorts::ResortRef;

// ---------------------------------------------------------------------------
// Events and results
// ---------------------------------------------------------------------------

/// Progress of a batch cycle, in the order it happens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
    Started {
        total: usize,
        groups: usize,
    },
    /// One resort finished, successfully or not.
    ResortCompleted {
        slug: String,
        reading: Option<CompositeReading>,
        bulletin: Option<AvalancheBulletin>,
        /// Resorts of this cycle still outstanding.
        pending: usize,
    },
    GroupFinished {
        index: usize,
        groups: usize,
    },
    Finished {
        fused: usize,
        failed: usize,
    },
}

/// Readings and bulletins gathered so far, owned by the caller.
///
/// Built by applying `BatchEvent`s. A completed resort without a reading
/// leaves any earlier reading for that resort in place, so a view kept
/// across cycles is superseded value by value as newer results arrive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSnapshot {
    pub readings: HashMap<String, CompositeReading>,
    pub bulletins: HashMap<u32, AvalancheBulletin>,
    pub pending: usize,
}

impl BatchSnapshot {
    pub fn apply(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Started { total, .. } => self.pending = *total,
            BatchEvent::ResortCompleted {
                slug,
                reading,
                bulletin,
                pending,
            } => {
                if let Some(reading) = reading {
                    self.readings.insert(slug.clone(), reading.clone());
                }
                if let Some(bulletin) = bulletin {
                    self.bulletins.insert(bulletin.region_id, bulletin.clone());
                }
                self.pending = *pending;
            }
            BatchEvent::GroupFinished { .. } => {}
            BatchEvent::Finished { .. } => self.pending = 0,
        }
    }

    /// True while resorts of the current cycle are outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn reading(&self, slug: &str) -> Option<&CompositeReading> {
        self.readings.get(slug)
    }

    pub fn bulletin_for(&self, resort: &ResortRef) -> Option<&AvalancheBulletin> {
        resort.avalanche_region.and_then(|id| self.bulletins.get(&id))
    }

    /// Status of `resort` on `today`, derived from the current values.
    pub fn assess(&self, resort: &ResortRef, today: NaiveDate) -> StatusAssessment {
        status::classify(
            &resort.season,
            today,
            self.reading(&resort.slug),
            self.bulletin_for(resort),
        )
    }
}

/// Sizes of the groups a catalog of `total` resorts is split into.
pub fn group_plan(total: usize, group_size: usize) -> Vec<usize> {
    let size = group_size.max(1);
    (0..total)
        .step_by(size)
        .map(|start| size.min(total - start))
        .collect()
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ResortOutcome {
    reading: Option<CompositeReading>,
    bulletin: Option<AvalancheBulletin>,
}

pub struct BatchOrchestrator {
    sources: Arc<dyn ResortSources>,
    group_size: usize,
    group_delay: Duration,
}

impl BatchOrchestrator {
    #[must_use]
    pub fn new(sources: Arc<dyn ResortSources>, config: &BatchConfig) -> Self {
        Self::with_schedule(sources, config.group_size, config.group_delay())
    }

    /// A group size of 0 is treated as 1.
    #[must_use]
    pub fn with_schedule(sources: Arc<dyn ResortSources>, group_size: usize, group_delay: Duration) -> Self {
        Self {
            sources,
            group_size: group_size.max(1),
            group_delay,
        }
    }

    /// Run one batch cycle and return its snapshot.
    pub async fn run(&self, catalog: &[ResortRef]) -> BatchSnapshot {
        self.run_inner(catalog, None).await
    }

    /// Run one batch cycle, publishing every event on `events` as it
    /// happens. A dropped receiver does not stop the cycle.
    pub async fn run_with_events(
        &self,
        catalog: &[ResortRef],
        events: mpsc::UnboundedSender<BatchEvent>,
    ) -> BatchSnapshot {
        self.run_inner(catalog, Some(&events)).await
    }

    /// Start a cycle in the background and hand back its event stream.
    pub fn spawn(
        self: Arc<Self>,
        catalog: Vec<ResortRef>,
    ) -> (JoinHandle<BatchSnapshot>, mpsc::UnboundedReceiver<BatchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move { self.run_with_events(&catalog, tx).await });
        (handle, rx)
    }

    async fn run_inner(
        &self,
        catalog: &[ResortRef],
        events: Option<&mpsc::UnboundedSender<BatchEvent>>,
    ) -> BatchSnapshot {
        let mut snapshot = BatchSnapshot::default();
        let mut publish = |event: BatchEvent| {
            snapshot.apply(&event);
            if let Some(tx) = events {
                // Receiver may be gone; the cycle still completes.
                let _ = tx.send(event);
            }
        };

        let total = catalog.len();
        let groups = group_plan(total, self.group_size).len();
        info!(total, groups, group_size = self.group_size, "Starting batch cycle");
        publish(BatchEvent::Started { total, groups });

        let mut pending = total;
        let mut fused = 0;

        for (index, group) in catalog.chunks(self.group_size).enumerate() {
            debug!(group = index + 1, groups, resorts = group.len(), "Dispatching group");

            // Dropping the set aborts whatever is still running.
            let mut in_flight = JoinSet::new();
            let mut slugs = HashMap::new();
            for resort in group {
                let task = in_flight.spawn(refresh_resort(Arc::clone(&self.sources), resort.clone()));
                slugs.insert(task.id(), resort.slug.clone());
            }

            while let Some(joined) = in_flight.join_next_with_id().await {
                pending -= 1;
                let (id, outcome) = match joined {
                    Ok(done) => done,
                    Err(err) => {
                        let slug = slugs.get(&err.id()).map(String::as_str).unwrap_or_default();
                        error!(resort = slug, error = %err, "Resort refresh task failed");
                        (err.id(), ResortOutcome::default())
                    }
                };
                let slug = slugs.remove(&id).unwrap_or_default();
                if outcome.reading.is_some() {
                    fused += 1;
                }
                publish(BatchEvent::ResortCompleted {
                    slug,
                    reading: outcome.reading,
                    bulletin: outcome.bulletin,
                    pending,
                });
            }

            publish(BatchEvent::GroupFinished { index, groups });

            if index + 1 < groups && !self.group_delay.is_zero() {
                tokio::time::sleep(self.group_delay).await;
            }
        }

        let failed = total - fused;
        logging::log_batch_summary(total, fused, failed);
        publish(BatchEvent::Finished { fused, failed });

        snapshot
    }
}

async fn refresh_resort(sources: Arc<dyn ResortSources>, resort: ResortRef) -> ResortOutcome {
    let bulletin = async {
        let region = resort.avalanche_region?;
        match sources.avalanche_bulletin(region).await {
            Ok(bulletin) => Some(bulletin),
            Err(err) => {
                logging::log_source_failure(DataSource::Bulletin, &region.to_string(), "bulletin lookup", &err);
                None
            }
        }
    };

    let (reading, bulletin) = tokio::join!(fusion::fuse_resort(sources.as_ref(), &resort), bulletin);
    if reading.is_none() {
        debug!(resort = %resort.slug, "No source delivered data");
    }
    ResortOutcome { reading, bulletin }
}

// ---------------------------------------------------------------------------
// Single-resort forecast
// ---------------------------------------------------------------------------

/// 7-day forecast for the resort that was opened.
#[derive(Debug, Clone, PartialEq)]
pub struct ResortForecast {
    pub slug: String,
    /// Empty when the lookup failed.
    pub days: Vec<ForecastDay>,
}

struct PendingForecast {
    slug: String,
    task: JoinHandle<Vec<ForecastDay>>,
}

/// Point-forecast lookup with at most one request in flight.
///
/// Selecting another resort aborts the previous lookup; its result is
/// never delivered. Independent of any running batch cycle.
pub struct ForecastLookup {
    source: Arc<dyn ForecastSource>,
    pending: Option<PendingForecast>,
}

impl ForecastLookup {
    #[must_use]
    pub fn new(source: Arc<dyn ForecastSource>) -> Self {
        Self {
            source,
            pending: None,
        }
    }

    /// Start the lookup for `resort`, replacing any lookup in flight.
    pub fn select(&mut self, resort: &ResortRef) {
        self.cancel();

        let source = Arc::clone(&self.source);
        let slug = resort.slug.clone();
        let (latitude, longitude) = (resort.latitude, resort.longitude);
        let task = tokio::spawn(async move {
            match source.point_forecast(latitude, longitude).await {
                Ok(days) => days,
                Err(err) => {
                    logging::log_source_failure(DataSource::Forecast, &slug, "point forecast", &err);
                    Vec::new()
                }
            }
        });

        self.pending = Some(PendingForecast {
            slug: resort.slug.clone(),
            task,
        });
    }

    /// Slug of the resort whose lookup is in flight.
    pub fn selected(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.slug.as_str())
    }

    pub fn cancel(&mut self) {
        if let Some(previous) = self.pending.take() {
            debug!(resort = %previous.slug, "Discarding forecast lookup");
            previous.task.abort();
        }
    }

    /// Wait for the selected resort's forecast. `None` when nothing is selected.
    pub async fn wait(&mut self) -> Option<ResortForecast> {
        let PendingForecast { slug, task } = self.pending.take()?;
        let days = match task.await {
            Ok(days) => days,
            Err(err) => {
                error!(resort = %slug, error = %err, "Forecast task failed");
                Vec::new()
            }
        };
        Some(ResortForecast { slug, days })
    }
}

impl Drop for ForecastLookup {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
