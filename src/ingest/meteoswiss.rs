/// MeteoSwiss SwissMetNet current measurements client.
///
/// The network publishes one `;`-delimited text file with the latest
/// 10-minute values of every automatic station, one line per station.
/// Only three columns matter here:
///
/// | index | parameter  | meaning                          |
/// |-------|------------|----------------------------------|
/// | 0     | station    | station abbreviation (e.g. `ZER`)|
/// | 2     | `tre200s0` | air temperature 2 m, °C          |
/// | 9     | gust peak  | km/h                             |
/// | 10    | `fu3010z0` | 10-minute mean wind, km/h        |
///
/// Missing values are published as `-`.

use tracing::debug;

use super::{get_text, round_half_up};
use crate::model::{GroundStationReading, IngestError};

const COL_STATION: usize = 0;
const COL_TEMPERATURE: usize = 2;
const COL_WIND_GUST: usize = 9;
const COL_WIND_MEAN: usize = 10;

/// Fetch the feed and extract the line for `station_code`.
pub async fn fetch_station(
    client: &reqwest::Client,
    feed_url: &str,
    station_code: &str,
) -> Result<GroundStationReading, IngestError> {
    let body = get_text(client, feed_url).await?;
    let reading = parse_station_line(&body, station_code)?;
    debug!(station = station_code, temp = reading.temperature_c, wind = reading.wind_kmh, "MeteoSwiss reading");
    Ok(reading)
}

/// Find the record for `station_code` and read temperature and wind.
///
/// Temperature is mandatory: a line without a numeric temperature is
/// `NoData`. Wind prefers the 10-minute mean, falls back to the gust peak
/// when the mean is missing or zero, and is 0 when neither is usable.
pub fn parse_station_line(body: &str, station_code: &str) -> Result<GroundStationReading, IngestError> {
    let fields: Vec<&str> = body
        .lines()
        .map(|l| l.trim_end_matches('\r').split(';').collect::<Vec<_>>())
        .find(|f| f.len() > 1 && f[COL_STATION] == station_code)
        .ok_or_else(|| IngestError::StationNotFound(station_code.to_string()))?;

    let temperature = numeric_field(&fields, COL_TEMPERATURE)
        .ok_or_else(|| IngestError::NoData(station_code.to_string()))?;

    let wind = numeric_field(&fields, COL_WIND_MEAN)
        .filter(|v| *v != 0.0)
        .or_else(|| numeric_field(&fields, COL_WIND_GUST).filter(|v| *v != 0.0))
        .unwrap_or(0.0);

    Ok(GroundStationReading {
        station: station_code.to_string(),
        temperature_c: round_half_up(temperature),
        wind_kmh: round_half_up(wind),
    })
}

fn numeric_field(fields: &[&str], index: usize) -> Option<f64> {
    fields
        .get(index)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
