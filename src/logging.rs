/// Structured logging for the resort conditions service
///
/// Wraps `tracing` with the context this service cares about: which
/// upstream provider a message concerns and which station, region or
/// resort it is about. Upstream failures are classified before logging so
/// that routine gaps (a resort without a snow station, a region missing
/// from today's bulletin) do not drown out real outages.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as subscriber_fmt};

use crate::model::IngestError;

// ---------------------------------------------------------------------------
// Subscriber configuration
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber. `RUST_LOG` takes precedence
    /// over the configured level. Calling this twice is a no-op.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let result = match self.format.as_str() {
            "json" => subscriber_fmt().json().with_env_filter(filter).try_init(),
            _ => subscriber_fmt().with_env_filter(filter).try_init(),
        };
        if result.is_err() {
            debug!("tracing subscriber already installed");
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    MeteoSwiss,
    Slf,
    OpenMeteo,
    Bulletin,
    Forecast,
    Batch,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::MeteoSwiss => write!(f, "METEOSWISS"),
            DataSource::Slf => write!(f, "SLF"),
            DataSource::OpenMeteo => write!(f, "OPENMETEO"),
            DataSource::Bulletin => write!(f, "BULLETIN"),
            DataSource::Forecast => write!(f, "FORECAST"),
            DataSource::Batch => write!(f, "BATCH"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Expected gap - station absent from the feed, region not in today's bulletin
    Expected,
    /// Service degradation - HTTP errors, timeouts, format changes
    Unexpected,
    /// Cannot tell, e.g. a station that is listed but reports nothing
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classify an upstream failure.
pub fn classify_failure(err: &IngestError) -> FailureType {
    match err {
        IngestError::StationNotFound(_) | IngestError::RegionNotFound(_) => FailureType::Expected,
        IngestError::Http(_) | IngestError::Transport(_) | IngestError::Parse(_) => {
            FailureType::Unexpected
        }
        IngestError::NoData(_) => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log an upstream failure at a level matching its classification.
pub fn log_source_failure(source: DataSource, key: &str, operation: &str, err: &IngestError) {
    let failure_type = classify_failure(err);
    match failure_type {
        FailureType::Expected => {
            debug!(source = %source, key, failure = %failure_type, error = %err, "{} failed", operation)
        }
        FailureType::Unexpected => {
            error!(source = %source, key, failure = %failure_type, error = %err, "{} failed", operation)
        }
        FailureType::Unknown => {
            warn!(source = %source, key, failure = %failure_type, error = %err, "{} failed", operation)
        }
    }
}

// ---------------------------------------------------------------------------
// Batch Summary Logging
// ---------------------------------------------------------------------------

/// Log the outcome of one batch cycle.
pub fn log_batch_summary(total: usize, fused: usize, failed: usize) {
    if failed == 0 {
        info!(source = %DataSource::Batch, total, fused, "Batch complete: {}/{} resorts fused", fused, total);
    } else if fused == 0 && total > 0 {
        error!(source = %DataSource::Batch, total, failed, "Batch complete: no resort could be fused");
    } else {
        warn!(
            source = %DataSource::Batch,
            total,
            fused,
            failed,
            "Batch complete: {}/{} resorts fused, {} without data",
            fused,
            total,
            failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_classification() {
        assert_eq!(
            classify_failure(&IngestError::StationNotFound("ZER".into())),
            FailureType::Expected
        );
        assert_eq!(classify_failure(&IngestError::RegionNotFound(4241)), FailureType::Expected);
        assert_eq!(classify_failure(&IngestError::Http(500)), FailureType::Unexpected);
        assert_eq!(
            classify_failure(&IngestError::Parse("unexpected end of input".into())),
            FailureType::Unexpected
        );
        assert_eq!(classify_failure(&IngestError::NoData("ZER2".into())), FailureType::Unknown);
    }

    #[test]
    fn test_data_source_labels() {
        assert_eq!(DataSource::MeteoSwiss.to_string(), "METEOSWISS");
        assert_eq!(DataSource::Batch.to_string(), "BATCH");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let config = LoggingConfig::default();
        config.init();
        config.init();
    }
}
