//! Resort operational status.
//!
//! The classifier is a pure function of three inputs: the season window
//! (evaluated against an injected date), the fused reading and the
//! avalanche bulletin. Rules are checked in a fixed order and the first
//! match wins:
//!
//! 1. date outside the season window          → `Closed`
//! 2. bulletin danger level ≥ 4               → `Closed`
//! 3. no fused reading                        → `Unknown`
//! 4. snow < 10 cm or wind > 70 km/h          → `Closed`
//! 5. snow < 30 cm or wind > 40 km/h or
//!    danger level == 3                       → `Partial`
//! 6. otherwise                               → `Open`
//!
//! # Clock injection
//! `classify` takes `today` rather than reading the clock, so results are
//! reproducible in tests. `classify_now` is the wall-clock convenience.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{AvalancheBulletin, CompositeReading, OperationalStatus};
use crate::resorts::SeasonWindow;

/// Bulletin level at or above which a resort is closed outright.
pub const DANGER_CLOSED_LEVEL: u8 = 4;
/// Bulletin level that restricts a resort to partial operation.
pub const DANGER_PARTIAL_LEVEL: u8 = 3;
/// Below this snow depth the resort is closed.
pub const SNOW_CLOSED_BELOW_CM: i32 = 10;
/// Below this snow depth only part of the area runs.
pub const SNOW_PARTIAL_BELOW_CM: i32 = 30;
/// Above this wind speed the resort is closed.
pub const WIND_CLOSED_ABOVE_KMH: i32 = 70;
/// Above this wind speed exposed lifts stop.
pub const WIND_PARTIAL_ABOVE_KMH: i32 = 40;

/// Status together with the season flag it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusAssessment {
    pub status: OperationalStatus,
    pub in_season: bool,
}

pub fn classify(
    season: &SeasonWindow,
    today: NaiveDate,
    reading: Option<&CompositeReading>,
    bulletin: Option<&AvalancheBulletin>,
) -> StatusAssessment {
    let in_season = season.contains(today);
    let status = if !in_season {
        OperationalStatus::Closed
    } else {
        classify_in_season(reading, bulletin)
    };
    StatusAssessment { status, in_season }
}

/// `classify` evaluated against the local calendar date.
pub fn classify_now(
    season: &SeasonWindow,
    reading: Option<&CompositeReading>,
    bulletin: Option<&AvalancheBulletin>,
) -> StatusAssessment {
    classify(season, chrono::Local::now().date_naive(), reading, bulletin)
}

fn classify_in_season(
    reading: Option<&CompositeReading>,
    bulletin: Option<&AvalancheBulletin>,
) -> OperationalStatus {
    let danger = bulletin.map(|b| b.level);

    if danger.is_some_and(|level| level >= DANGER_CLOSED_LEVEL) {
        return OperationalStatus::Closed;
    }

    let Some(reading) = reading else {
        return OperationalStatus::Unknown;
    };

    if reading.snow_depth_cm < SNOW_CLOSED_BELOW_CM || reading.wind_kmh > WIND_CLOSED_ABOVE_KMH {
        return OperationalStatus::Closed;
    }

    if reading.snow_depth_cm < SNOW_PARTIAL_BELOW_CM
        || reading.wind_kmh > WIND_PARTIAL_ABOVE_KMH
        || danger == Some(DANGER_PARTIAL_LEVEL)
    {
        return OperationalStatus::Partial;
    }

    OperationalStatus::Open
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
