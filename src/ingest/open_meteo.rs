/// Open-Meteo forecast API client.
///
/// Used two ways:
///   - current conditions at a resort's coordinates, the universal
///     fallback source for every resort in a batch cycle;
///   - the 7-day daily forecast shown when a single resort is opened.
///
/// Neither call needs a per-resort identifier, only latitude/longitude.
///
/// API Documentation: https://open-meteo.com/en/docs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{get_text, round_half_up};
use crate::model::{IngestError, ModelReading};

/// Local time zone requested from the API (URL-encoded).
const TIMEZONE: &str = "Europe%2FZurich";

/// Number of days returned by the point forecast.
pub const FORECAST_DAYS: usize = 7;

// ============================================================================
// API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
pub struct CurrentConditions {
    pub temperature_2m: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub weather_code: Option<u8>,
    /// Metres.
    pub snow_depth: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct DailyResponse {
    pub daily: DailySeries,
}

/// Parallel arrays, one entry per day.
#[derive(Debug, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub weather_code: Vec<Option<u8>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    /// Centimetres.
    pub snowfall_sum: Vec<Option<f64>>,
}

/// One day of the point forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_c: i32,
    pub min_c: i32,
    pub snowfall_cm: f64,
    pub weather_code: u8,
}

// ============================================================================
// URL construction
// ============================================================================

pub fn build_current_url(base_url: &str, latitude: f64, longitude: f64) -> String {
    format!(
        "{}?latitude={}&longitude={}&current=temperature_2m,weather_code,wind_speed_10m,snow_depth&timezone={}",
        base_url, latitude, longitude, TIMEZONE
    )
}

pub fn build_daily_url(base_url: &str, latitude: f64, longitude: f64) -> String {
    format!(
        "{}?latitude={}&longitude={}&daily=weather_code,temperature_2m_max,temperature_2m_min,snowfall_sum&timezone={}",
        base_url, latitude, longitude, TIMEZONE
    )
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetch current modelled conditions at a grid point.
pub async fn fetch_current(
    client: &reqwest::Client,
    base_url: &str,
    latitude: f64,
    longitude: f64,
) -> Result<ModelReading, IngestError> {
    let url = build_current_url(base_url, latitude, longitude);
    let body = get_text(client, &url).await?;
    parse_current(&body)
}

/// Fetch the daily forecast for the next `FORECAST_DAYS` days.
pub async fn fetch_point_forecast(
    client: &reqwest::Client,
    base_url: &str,
    latitude: f64,
    longitude: f64,
) -> Result<Vec<ForecastDay>, IngestError> {
    let url = build_daily_url(base_url, latitude, longitude);
    let body = get_text(client, &url).await?;
    let days = parse_daily(&body)?;
    debug!(latitude, longitude, days = days.len(), "Open-Meteo point forecast");
    Ok(days)
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse current conditions.
///
/// Temperature and wind are required. Snow depth is converted from metres
/// to centimetres and floored at 0; a missing depth reads as 0.
pub fn parse_current(body: &str) -> Result<ModelReading, IngestError> {
    let response: CurrentResponse = serde_json::from_str(body)?;
    let current = response.current;

    let (Some(temperature), Some(wind)) = (current.temperature_2m, current.wind_speed_10m) else {
        return Err(IngestError::NoData("open-meteo current".to_string()));
    };

    let snow_depth_cm = current
        .snow_depth
        .map(|metres| round_half_up(metres * 100.0))
        .unwrap_or(0)
        .max(0);

    Ok(ModelReading {
        temperature_c: round_half_up(temperature),
        wind_kmh: round_half_up(wind),
        weather_code: current.weather_code,
        snow_depth_cm,
    })
}

/// Parse the daily series into at most `FORECAST_DAYS` days.
///
/// Days with an unparseable date or any missing value are skipped rather
/// than failing the whole forecast.
pub fn parse_daily(body: &str) -> Result<Vec<ForecastDay>, IngestError> {
    let response: DailyResponse = serde_json::from_str(body)?;
    let d = response.daily;

    let days = d
        .time
        .iter()
        .enumerate()
        .take(FORECAST_DAYS)
        .filter_map(|(i, date)| {
            Some(ForecastDay {
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
                max_c: round_half_up((*d.temperature_2m_max.get(i)?)?),
                min_c: round_half_up((*d.temperature_2m_min.get(i)?)?),
                snowfall_cm: (*d.snowfall_sum.get(i)?)?,
                weather_code: (*d.weather_code.get(i)?)?,
            })
        })
        .collect();

    Ok(days)
}

// ============================================================================
// Tests
// ============================================================================
