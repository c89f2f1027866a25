//! The seam between the batch orchestrator and the upstream providers.
//!
//! The orchestrator only sees `ResortSources`; `LiveSources` is the HTTP
//! implementation and tests substitute in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::open_meteo::ForecastDay;
use super::{avalanche, meteoswiss, open_meteo, slf};
use crate::config::SourcesConfig;
use crate::model::{AvalancheBulletin, GroundStationReading, IngestError, ModelReading, SnowStationReading};

/// One request per call, no retries.
#[async_trait]
pub trait ResortSources: Send + Sync {
    /// Official ground-station network, keyed by station code.
    async fn ground_station(&self, code: &str) -> Result<GroundStationReading, IngestError>;

    /// Snow/avalanche sensor network, keyed by station code.
    async fn snow_station(&self, code: &str) -> Result<SnowStationReading, IngestError>;

    /// Global forecast model at a coordinate.
    async fn forecast_model(&self, latitude: f64, longitude: f64) -> Result<ModelReading, IngestError>;

    /// Avalanche bulletin for a danger region.
    async fn avalanche_bulletin(&self, region_id: u32) -> Result<AvalancheBulletin, IngestError>;
}

/// Single-resort 7-day forecast.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn point_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastDay>, IngestError>;
}

/// HTTP-backed sources using the configured endpoints.
pub struct LiveSources {
    http: reqwest::Client,
    config: SourcesConfig,
}

impl LiveSources {
    #[must_use]
    pub fn new(config: SourcesConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().unwrap_or_else(|err| {
            warn!(error = %err, "Failed to build HTTP client, using defaults");
            reqwest::Client::new()
        });
        Self { http, config }
    }

    /// Use an existing client, e.g. one shared with other components.
    #[must_use]
    pub fn with_client(http: reqwest::Client, config: SourcesConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl ResortSources for LiveSources {
    async fn ground_station(&self, code: &str) -> Result<GroundStationReading, IngestError> {
        meteoswiss::fetch_station(&self.http, &self.config.meteoswiss_url, code).await
    }

    async fn snow_station(&self, code: &str) -> Result<SnowStationReading, IngestError> {
        slf::fetch_station(&self.http, &self.config.slf_url, code).await
    }

    async fn forecast_model(&self, latitude: f64, longitude: f64) -> Result<ModelReading, IngestError> {
        open_meteo::fetch_current(&self.http, &self.config.open_meteo_url, latitude, longitude).await
    }

    async fn avalanche_bulletin(&self, region_id: u32) -> Result<AvalancheBulletin, IngestError> {
        avalanche::fetch_bulletin(&self.http, &self.config.bulletin_url, region_id).await
    }
}

#[async_trait]
impl ForecastSource for LiveSources {
    async fn point_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastDay>, IngestError> {
        open_meteo::fetch_point_forecast(&self.http, &self.config.open_meteo_url, latitude, longitude).await
    }
}
