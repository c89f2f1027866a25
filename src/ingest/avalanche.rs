/// Avalanche bulletin lookup.
///
/// The bulletin feed is a JSON array of regional bulletins. A bulletin
/// names the danger regions it covers either as a `regions` list or as a
/// single `regionId`; region ids appear both as numbers and as strings.
/// The first bulletin covering the requested region wins.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use super::get_text;
use crate::model::{AvalancheBulletin, IngestError};

/// Danger level used when the feed gives none or one outside the scale.
pub const DEFAULT_DANGER_LEVEL: u8 = 2;

const DEFAULT_SUMMARY: &str = "Conditions vary with altitude and aspect.";

/// European avalanche danger scale.
const DANGER_LABELS: [(u8, &str); 5] = [
    (1, "Low"),
    (2, "Moderate"),
    (3, "Considerable"),
    (4, "High"),
    (5, "Very High"),
];

// ============================================================================
// Feed records
// ============================================================================
//
// Records are read field by field from untyped JSON. The feed mixes shapes
// between regions, and one odd record must not hide the bulletin of any
// other region.

/// A region id given as a number or a numeric string.
fn region_id_of(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|id| u32::try_from(id).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn covers(record: &Value, region_id: u32) -> bool {
    let in_list = record
        .get("regions")
        .and_then(Value::as_array)
        .is_some_and(|regions| regions.iter().any(|r| region_id_of(r) == Some(region_id)));
    in_list || record.get("regionId").and_then(region_id_of) == Some(region_id)
}

/// Integral rating (`3`, `3.0` or `"3"`); anything else is absent.
fn rating_of(record: &Value, key: &str) -> Option<u8> {
    let number = match record.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (number.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&number)).then_some(number as u8)
}

/// Non-blank text field.
fn text_of(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

// ============================================================================
// Danger scale
// ============================================================================

/// Label for a danger level, `None` outside 1..=5.
pub fn danger_label(level: u8) -> Option<&'static str> {
    DANGER_LABELS
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, label)| *label)
}

/// Pick the rating (falling back to the level field, zero meaning absent)
/// and map it onto the scale. Unmapped ratings become Moderate.
fn normalize_level(rating: Option<u8>, level: Option<u8>) -> (u8, &'static str) {
    let raw = rating
        .filter(|r| *r != 0)
        .or(level.filter(|l| *l != 0))
        .unwrap_or(DEFAULT_DANGER_LEVEL);

    match danger_label(raw) {
        Some(label) => (raw, label),
        None => (DEFAULT_DANGER_LEVEL, "Moderate"),
    }
}

// ============================================================================
// Lookup
// ============================================================================

pub async fn fetch_bulletin(
    client: &reqwest::Client,
    feed_url: &str,
    region_id: u32,
) -> Result<AvalancheBulletin, IngestError> {
    let body = get_text(client, feed_url).await?;
    let bulletin = parse_bulletin(&body, region_id)?;
    debug!(region = region_id, level = bulletin.level, "Avalanche bulletin");
    Ok(bulletin)
}

/// Extract the bulletin for `region_id` from a feed payload.
///
/// Only a payload that is not a JSON array is a parse error; records that
/// do not look like bulletins are skipped.
pub fn parse_bulletin(body: &str, region_id: u32) -> Result<AvalancheBulletin, IngestError> {
    let records: Vec<Value> = serde_json::from_str(body)?;

    let record = records
        .iter()
        .find(|r| covers(r, region_id))
        .ok_or(IngestError::RegionNotFound(region_id))?;

    let (level, level_label) =
        normalize_level(rating_of(record, "dangerRating"), rating_of(record, "dangerLevel"));

    let published = record
        .pointer("/validTime/startTime")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(AvalancheBulletin {
        region_id,
        level,
        level_label,
        region_name: text_of(record, "regionName").unwrap_or_else(|| format!("Region {}", region_id)),
        summary: text_of(record, "highlights")
            .or_else(|| text_of(record, "dangerDescription"))
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        published,
    })
}

// ============================================================================
// Tests
// ============================================================================
