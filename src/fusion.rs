//! Multi-source fusion.
//!
//! Merges the partial readings gathered for one resort into a single
//! `CompositeReading`. Which source wins for a field is decided by
//! `RESOLUTION_TABLE` alone; the reliability grade only reports how many
//! official networks took part and never changes the precedence.

use tracing::debug;

use crate::ingest::sources::ResortSources;
use crate::logging::{DataSource, log_source_failure};
use crate::model::{CompositeReading, IngestError, PartialReading, Reliability, SourceId};
use crate::resorts::ResortRef;

/// WMO code 1, "mainly clear", used when the model supplied no code.
pub const NEUTRAL_WEATHER_CODE: u8 = 1;

/// The fields of a composite reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Temperature,
    SnowDepth,
    Wind,
    WeatherCode,
}

/// Per-field source precedence, first available wins.
pub const RESOLUTION_TABLE: [(Field, &[SourceId]); 4] = [
    (
        Field::Temperature,
        &[SourceId::MeteoSwiss, SourceId::Slf, SourceId::OpenMeteo],
    ),
    (Field::SnowDepth, &[SourceId::Slf, SourceId::OpenMeteo]),
    (
        Field::Wind,
        &[SourceId::MeteoSwiss, SourceId::Slf, SourceId::OpenMeteo],
    ),
    (Field::WeatherCode, &[SourceId::OpenMeteo]),
];

impl Field {
    pub fn precedence(self) -> &'static [SourceId] {
        RESOLUTION_TABLE
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, order)| *order)
            .unwrap_or(&[])
    }

    fn value_in(self, reading: &PartialReading) -> Option<i32> {
        match self {
            Field::Temperature => reading.temperature_c(),
            Field::SnowDepth => reading.snow_depth_cm(),
            Field::Wind => reading.wind_kmh(),
            Field::WeatherCode => reading.weather_code().map(i32::from),
        }
    }
}

/// Value of `field` from the highest-precedence source that has one.
pub fn resolve(field: Field, partials: &[PartialReading]) -> Option<i32> {
    field.precedence().iter().find_map(|source| {
        partials
            .iter()
            .find(|p| p.source() == *source)
            .and_then(|p| field.value_in(p))
    })
}

/// `High` with both official networks, `Medium` with one, `Low` otherwise.
pub fn grade_reliability(partials: &[PartialReading]) -> Reliability {
    let has = |source: SourceId| partials.iter().any(|p| p.source() == source);
    match (has(SourceId::MeteoSwiss), has(SourceId::Slf)) {
        (true, true) => Reliability::High,
        (true, false) | (false, true) => Reliability::Medium,
        (false, false) => Reliability::Low,
    }
}

/// Fuse partial readings. `None` when nothing was delivered.
pub fn fuse(partials: &[PartialReading]) -> Option<CompositeReading> {
    if partials.is_empty() {
        return None;
    }

    let weather_code = resolve(Field::WeatherCode, partials)
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(NEUTRAL_WEATHER_CODE);

    Some(CompositeReading {
        temperature_c: resolve(Field::Temperature, partials).unwrap_or(0),
        wind_kmh: resolve(Field::Wind, partials).unwrap_or(0),
        snow_depth_cm: resolve(Field::SnowDepth, partials).unwrap_or(0),
        weather_code,
        source: SourceId::Hybrid,
        reliability: grade_reliability(partials),
    })
}

// ---------------------------------------------------------------------------
// Per-resort fan-out
// ---------------------------------------------------------------------------

fn absorb<T>(source: DataSource, key: &str, result: Result<T, IngestError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log_source_failure(source, key, "fetch", &err);
            None
        }
    }
}

/// Query every applicable source for `resort` concurrently.
///
/// Official networks are only asked when the resort carries their station
/// code; the forecast model is always asked. Failures are logged and
/// dropped, so the result holds only successful readings.
pub async fn collect_partials(sources: &dyn ResortSources, resort: &ResortRef) -> Vec<PartialReading> {
    let ground = async {
        match resort.meteoswiss_code.as_deref() {
            Some(code) => absorb(DataSource::MeteoSwiss, code, sources.ground_station(code).await)
                .map(PartialReading::MeteoSwiss),
            None => None,
        }
    };
    let snow = async {
        match resort.slf_code.as_deref() {
            Some(code) => absorb(DataSource::Slf, code, sources.snow_station(code).await)
                .map(PartialReading::Slf),
            None => None,
        }
    };
    let model = async {
        absorb(
            DataSource::OpenMeteo,
            &resort.slug,
            sources.forecast_model(resort.latitude, resort.longitude).await,
        )
        .map(PartialReading::OpenMeteo)
    };

    let (ground, snow, model) = tokio::join!(ground, snow, model);
    let partials: Vec<PartialReading> = [ground, snow, model].into_iter().flatten().collect();
    debug!(resort = %resort.slug, sources = partials.len(), "Collected partial readings");
    partials
}

/// Collect and fuse in one step.
pub async fn fuse_resort(sources: &dyn ResortSources, resort: &ResortRef) -> Option<CompositeReading> {
    let partials = collect_partials(sources, resort).await;
    fuse(&partials)
}
