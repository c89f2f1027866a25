/// Core data types for the resort conditions service.
///
/// This module defines the shared domain model imported by all other modules:
/// the per-source partial readings, the fused composite reading, avalanche
/// bulletins and the operational status. It contains no I/O.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Identifies where a reading came from.
///
/// `Hybrid` is only ever carried by a fused `CompositeReading`; partial
/// readings are always tagged with the provider that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    /// MeteoSwiss SwissMetNet ground stations (official network).
    MeteoSwiss,
    /// SLF IMIS snow stations (official snow/avalanche sensor network).
    Slf,
    /// Open-Meteo global forecast model.
    OpenMeteo,
    Hybrid,
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::MeteoSwiss => write!(f, "meteoswiss"),
            SourceId::Slf => write!(f, "slf"),
            SourceId::OpenMeteo => write!(f, "openmeteo"),
            SourceId::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Intrinsic reliability of a single source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Official measurement networks.
    High,
    /// Modelled values.
    Low,
}

// ---------------------------------------------------------------------------
// Partial readings
// ---------------------------------------------------------------------------

/// Temperature and wind from an official ground station.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundStationReading {
    pub station: String,
    pub temperature_c: i32,
    pub wind_kmh: i32,
}

/// Snow height, plus whatever meteorology the snow station reports.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowStationReading {
    pub station: String,
    pub snow_depth_cm: i32,
    pub temperature_c: Option<i32>,
    pub wind_kmh: Option<i32>,
}

/// Current conditions from the global forecast model at a grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReading {
    pub temperature_c: i32,
    pub wind_kmh: i32,
    /// WMO weather interpretation code, when the model returned one.
    pub weather_code: Option<u8>,
    pub snow_depth_cm: i32,
}

/// A fragment of a resort's conditions as delivered by exactly one source.
///
/// Each variant carries only the fields its provider can deliver, so the
/// set of fields a source contributes is fixed by the type.
#[derive(Debug, Clone, PartialEq)]
pub enum PartialReading {
    MeteoSwiss(GroundStationReading),
    Slf(SnowStationReading),
    OpenMeteo(ModelReading),
}

impl PartialReading {
    pub fn source(&self) -> SourceId {
        match self {
            PartialReading::MeteoSwiss(_) => SourceId::MeteoSwiss,
            PartialReading::Slf(_) => SourceId::Slf,
            PartialReading::OpenMeteo(_) => SourceId::OpenMeteo,
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            PartialReading::MeteoSwiss(_) | PartialReading::Slf(_) => Tier::High,
            PartialReading::OpenMeteo(_) => Tier::Low,
        }
    }

    pub fn temperature_c(&self) -> Option<i32> {
        match self {
            PartialReading::MeteoSwiss(r) => Some(r.temperature_c),
            PartialReading::Slf(r) => r.temperature_c,
            PartialReading::OpenMeteo(r) => Some(r.temperature_c),
        }
    }

    pub fn wind_kmh(&self) -> Option<i32> {
        match self {
            PartialReading::MeteoSwiss(r) => Some(r.wind_kmh),
            PartialReading::Slf(r) => r.wind_kmh,
            PartialReading::OpenMeteo(r) => Some(r.wind_kmh),
        }
    }

    pub fn snow_depth_cm(&self) -> Option<i32> {
        match self {
            PartialReading::MeteoSwiss(_) => None,
            PartialReading::Slf(r) => Some(r.snow_depth_cm),
            PartialReading::OpenMeteo(r) => Some(r.snow_depth_cm),
        }
    }

    pub fn weather_code(&self) -> Option<u8> {
        match self {
            PartialReading::OpenMeteo(r) => r.weather_code,
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Composite reading
// ---------------------------------------------------------------------------

/// Confidence grade of a fused reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    /// Both official networks contributed.
    High,
    /// Exactly one official network contributed.
    Medium,
    /// Only the forecast model contributed.
    Low,
}

/// The fused, single-valued conditions snapshot for one resort.
///
/// Produced by `fusion::fuse`. Every field is always populated; fields no
/// source could provide carry neutral defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeReading {
    pub temperature_c: i32,
    pub wind_kmh: i32,
    pub snow_depth_cm: i32,
    pub weather_code: u8,
    pub source: SourceId,
    pub reliability: Reliability,
}

// ---------------------------------------------------------------------------
// Avalanche bulletin
// ---------------------------------------------------------------------------

/// Regional avalanche danger as published in the bulletin feed.
///
/// One bulletin may serve every resort assigned to the same region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvalancheBulletin {
    pub region_id: u32,
    /// European danger scale, 1 (low) to 5 (very high).
    pub level: u8,
    pub level_label: &'static str,
    pub region_name: String,
    pub summary: String,
    /// Start of validity; `None` when the feed omits it.
    pub published: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Operational status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationalStatus {
    Open,
    Closed,
    Partial,
    Unknown,
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationalStatus::Open => write!(f, "open"),
            OperationalStatus::Closed => write!(f, "closed"),
            OperationalStatus::Partial => write!(f, "partial"),
            OperationalStatus::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or parsing an upstream feed.
///
/// None of these ever leave a resort's fan-out: they are logged and turned
/// into "no data" for the adapter that produced them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    /// Non-2xx HTTP response.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// Connection, TLS or timeout failure before a status was received.
    #[error("Request failed: {0}")]
    Transport(String),
    /// The response body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
    /// The feed was readable but had no line or record for this station.
    #[error("Station not found: {0}")]
    StationNotFound(String),
    /// The station was found but carried no usable value.
    #[error("No data available for station: {0}")]
    NoData(String),
    /// No bulletin in the feed covers the region.
    #[error("No bulletin for region: {0}")]
    RegionNotFound(u32),
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            IngestError::Http(status.as_u16())
        } else if err.is_decode() {
            IngestError::Parse(err.to_string())
        } else {
            IngestError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_reading_tiers_follow_source() {
        let official = PartialReading::MeteoSwiss(GroundStationReading {
            station: "SIO".to_string(),
            temperature_c: 3,
            wind_kmh: 12,
        });
        let model = PartialReading::OpenMeteo(ModelReading {
            temperature_c: 1,
            wind_kmh: 8,
            weather_code: Some(3),
            snow_depth_cm: 40,
        });
        assert_eq!(official.tier(), Tier::High);
        assert_eq!(official.source(), SourceId::MeteoSwiss);
        assert_eq!(model.tier(), Tier::Low);
        assert_eq!(model.source(), SourceId::OpenMeteo);
    }

    #[test]
    fn test_ground_station_never_reports_snow_or_weather_code() {
        let official = PartialReading::MeteoSwiss(GroundStationReading {
            station: "SIO".to_string(),
            temperature_c: 3,
            wind_kmh: 12,
        });
        assert_eq!(official.snow_depth_cm(), None);
        assert_eq!(official.weather_code(), None);
    }

    #[test]
    fn test_snow_station_optional_fields_pass_through() {
        let snow = PartialReading::Slf(SnowStationReading {
            station: "VDS2".to_string(),
            snow_depth_cm: 85,
            temperature_c: None,
            wind_kmh: Some(22),
        });
        assert_eq!(snow.snow_depth_cm(), Some(85));
        assert_eq!(snow.temperature_c(), None);
        assert_eq!(snow.wind_kmh(), Some(22));
    }

    #[test]
    fn test_ingest_error_messages() {
        assert_eq!(IngestError::Http(503).to_string(), "HTTP error: 503");
        assert_eq!(
            IngestError::RegionNotFound(4113).to_string(),
            "No bulletin for region: 4113"
        );
    }
}
