/// Upstream data source clients.
///
/// Submodules:
/// - `meteoswiss` — official ground-station network, flat `;`-delimited feed
/// - `slf`        — IMIS snow stations, latest measurement per station
/// - `open_meteo` — global forecast model: current conditions + 7-day forecast
/// - `avalanche`  — regional avalanche bulletin lookup
/// - `sources`    — the `ResortSources` seam used by the orchestrator
///
/// Every `fetch_*` function performs exactly one request and returns a
/// `Result`. Turning failures into "no data" is the caller's job.

pub mod avalanche;
pub mod meteoswiss;
pub mod open_meteo;
pub mod slf;
pub mod sources;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::model::IngestError;

/// Rounds half-way values towards positive infinity, so -2.5 becomes -2
/// and 2.5 becomes 3.
pub(crate) fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Sends a GET request and returns the body of a successful response.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, IngestError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(IngestError::Http(response.status().as_u16()));
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(0.0), 0);
    }
}
