/// SLF IMIS snow station client.
///
/// The measurement API returns the latest half-hourly record for a single
/// station. Fields used:
///   - `hs` snow height, cm
///   - `ta` air temperature, °C (not every station has one)
///   - `vw` mean wind speed
///
/// API: https://measurement-api.slf.ch/

use serde::Deserialize;
use tracing::debug;

use super::{get_text, round_half_up};
use crate::model::{IngestError, SnowStationReading};

/// Latest measurement record; unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct SlfMeasurement {
    pub hs: Option<f64>,
    pub ta: Option<f64>,
    pub vw: Option<f64>,
}

pub fn build_latest_url(base_url: &str, station_code: &str) -> String {
    format!(
        "{}/{}/measurements/latest",
        base_url.trim_end_matches('/'),
        station_code
    )
}

pub async fn fetch_station(
    client: &reqwest::Client,
    base_url: &str,
    station_code: &str,
) -> Result<SnowStationReading, IngestError> {
    let url = build_latest_url(base_url, station_code);
    let body = get_text(client, &url).await?;
    let reading = parse_latest(&body, station_code)?;
    debug!(station = station_code, snow = reading.snow_depth_cm, "SLF reading");
    Ok(reading)
}

/// Parse a latest-measurement payload.
///
/// A record without a snow height still counts as a reading with 0 cm;
/// temperature and wind are passed through only when present. A wind of
/// exactly 0 is an idle anemometer, not calm air, and reads as absent.
pub fn parse_latest(body: &str, station_code: &str) -> Result<SnowStationReading, IngestError> {
    let measurement: SlfMeasurement = serde_json::from_str(body)?;

    Ok(SnowStationReading {
        station: station_code.to_string(),
        snow_depth_cm: measurement.hs.map(round_half_up).unwrap_or(0),
        temperature_c: measurement.ta.map(round_half_up),
        wind_kmh: measurement.vw.filter(|v| *v != 0.0).map(round_half_up),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::{SLF_LATEST_JSON, SLF_NO_SNOW_JSON, SLF_SNOW_ONLY_JSON};

    #[test]
    fn test_full_record() {
        let reading = parse_latest(SLF_LATEST_JSON, "ZER2").expect("fixture should parse");
        assert_eq!(reading.station, "ZER2");
        assert_eq!(reading.snow_depth_cm, 87);
        assert_eq!(reading.temperature_c, Some(-5));
        assert_eq!(reading.wind_kmh, Some(19));
    }

    #[test]
    fn test_snow_only_station_leaves_meteorology_empty() {
        let reading = parse_latest(SLF_SNOW_ONLY_JSON, "SAA2").unwrap();
        assert_eq!(reading.snow_depth_cm, 142);
        assert_eq!(reading.temperature_c, None);
        assert_eq!(reading.wind_kmh, None);
    }

    #[test]
    fn test_missing_snow_height_reads_as_zero() {
        let reading = parse_latest(SLF_NO_SNOW_JSON, "GUT2").unwrap();
        assert_eq!(reading.snow_depth_cm, 0);
        assert_eq!(reading.temperature_c, Some(-3));
    }

    #[test]
    fn test_zero_wind_is_absent_so_model_wind_applies() {
        let reading = parse_latest(r#"{"hs": 64.0, "ta": -2.0, "vw": 0.0}"#, "VAL2").unwrap();
        assert_eq!(reading.wind_kmh, None, "zero wind should not count as a measurement");
        assert_eq!(reading.temperature_c, Some(-2));
    }

    #[test]
    fn test_zero_temperature_is_kept() {
        let reading = parse_latest(r#"{"hs": 64.0, "ta": 0.0}"#, "VAL2").unwrap();
        assert_eq!(reading.temperature_c, Some(0));
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let result = parse_latest("<html>502 Bad Gateway</html>", "ZER2");
        assert!(matches!(result, Err(IngestError::Parse(_))));
    }

    #[test]
    fn test_latest_url_tolerates_trailing_slash() {
        assert_eq!(
            build_latest_url("https://measurement-api.slf.ch/api/stations/", "ZER2"),
            "https://measurement-api.slf.ch/api/stations/ZER2/measurements/latest"
        );
    }
}
