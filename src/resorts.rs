/// Resort catalog for the conditions service.
///
/// Defines the reference data for every monitored ski resort: location,
/// the upstream station codes used to query each provider, the avalanche
/// danger region and the season window. The catalog is read once at
/// startup from a TOML file and is immutable afterwards. All other modules
/// should take resorts from here rather than hardcoding station codes.

use std::collections::HashSet;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use thiserror::Error;

/// The catalog shipped with the service.
pub const DEFAULT_CATALOG: &str = include_str!("../resorts.toml");

// ---------------------------------------------------------------------------
// Resort metadata
// ---------------------------------------------------------------------------

/// Dates between which lifts are scheduled to run, inclusive at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeasonWindow {
    pub opening: NaiveDate,
    pub closing: NaiveDate,
}

impl SeasonWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.opening && date <= self.closing
    }
}

/// Published lift hours, free text as printed by the resort.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpeningHours {
    pub weekdays: String,
    pub weekends: String,
}

impl OpeningHours {
    /// Hours that apply on `date` (Saturday and Sunday use weekend hours).
    pub fn for_date(&self, date: NaiveDate) -> &str {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => &self.weekends,
            _ => &self.weekdays,
        }
    }
}

/// Metadata for a single ski resort.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResortRef {
    /// Unique, URL-safe key.
    pub slug: String,
    pub name: String,
    pub canton: String,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Reference altitude in metres.
    pub altitude_m: u32,
    /// SwissMetNet station abbreviation, if a ground station is close enough.
    #[serde(default)]
    pub meteoswiss_code: Option<String>,
    /// IMIS snow station code, if one covers the ski area.
    #[serde(default)]
    pub slf_code: Option<String>,
    /// Avalanche bulletin danger region.
    #[serde(default)]
    pub avalanche_region: Option<u32>,
    pub season: SeasonWindow,
    pub opening_hours: OpeningHours,
    #[serde(default)]
    pub website: Option<String>,
    pub lift_count: u32,
    pub slope_km: f64,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "resort", default)]
    resorts: Vec<ResortRef>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate resort slug '{0}'")]
    DuplicateSlug(String),

    #[error("resort '{slug}' is invalid: {reason}")]
    InvalidResort { slug: String, reason: String },
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses and validates a TOML catalog. Resort order is preserved.
pub fn parse_catalog(text: &str) -> Result<Vec<ResortRef>, CatalogError> {
    let file: CatalogFile = toml::from_str(text)?;
    validate(&file.resorts)?;
    Ok(file.resorts)
}

/// Reads a catalog from disk.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<ResortRef>, CatalogError> {
    let text = std::fs::read_to_string(path)?;
    parse_catalog(&text)
}

/// The built-in catalog.
pub fn default_catalog() -> Result<Vec<ResortRef>, CatalogError> {
    parse_catalog(DEFAULT_CATALOG)
}

fn validate(resorts: &[ResortRef]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for resort in resorts {
        let invalid = |reason: &str| CatalogError::InvalidResort {
            slug: resort.slug.clone(),
            reason: reason.to_string(),
        };

        if resort.slug.trim().is_empty() {
            return Err(invalid("empty slug"));
        }
        if !seen.insert(resort.slug.as_str()) {
            return Err(CatalogError::DuplicateSlug(resort.slug.clone()));
        }
        if resort.name.trim().is_empty() {
            return Err(invalid("empty name"));
        }
        if !(-90.0..=90.0).contains(&resort.latitude)
            || !(-180.0..=180.0).contains(&resort.longitude)
        {
            return Err(invalid("coordinates out of range"));
        }
        if resort.season.opening > resort.season.closing {
            return Err(invalid("season closes before it opens"));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Looks up a resort by slug. Returns `None` if not found.
pub fn find_resort<'a>(catalog: &'a [ResortRef], slug: &str) -> Option<&'a ResortRef> {
    catalog.iter().find(|r| r.slug == slug)
}

/// Case-insensitive substring match on name or canton. A blank query
/// returns the whole catalog.
pub fn search<'a>(catalog: &'a [ResortRef], query: &str) -> Vec<&'a ResortRef> {
    let needle = query.trim().to_lowercase();
    catalog
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle) || r.canton.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Distinct avalanche regions referenced by the catalog, in first-seen order.
pub fn avalanche_regions(catalog: &[ResortRef]) -> Vec<u32> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .filter_map(|r| r.avalanche_region)
        .filter(|id| seen.insert(*id))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RESORTS: &str = r#"
        [[resort]]
        slug = "verbier"
        name = "Verbier"
        canton = "Valais"
        latitude = 46.0964
        longitude = 7.2286
        altitude_m = 1500
        meteoswiss_code = "ATT"
        slf_code = "ATT2"
        avalanche_region = 4221
        lift_count = 35
        slope_km = 410.0
        season = { opening = "2025-12-06", closing = "2026-04-19" }
        opening_hours = { weekdays = "08:45-16:30", weekends = "08:30-16:30" }

        [[resort]]
        slug = "les-diablerets"
        name = "Les Diablerets"
        canton = "Vaud"
        latitude = 46.3497
        longitude = 7.1597
        altitude_m = 1150
        lift_count = 18
        slope_km = 120.0
        season = { opening = "2025-12-13", closing = "2026-04-06" }
        opening_hours = { weekdays = "09:00-16:15", weekends = "08:30-16:15" }
    "#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_catalog_preserves_order_and_optional_codes() {
        let catalog = parse_catalog(TWO_RESORTS).expect("catalog should parse");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].slug, "verbier");
        assert_eq!(catalog[0].meteoswiss_code.as_deref(), Some("ATT"));
        assert_eq!(catalog[0].avalanche_region, Some(4221));
        assert_eq!(catalog[1].slug, "les-diablerets");
        assert!(catalog[1].meteoswiss_code.is_none());
        assert!(catalog[1].slf_code.is_none());
        assert!(catalog[1].avalanche_region.is_none());
    }

    #[test]
    fn test_duplicate_slug_is_rejected() {
        let doubled = format!("{}\n{}", TWO_RESORTS, TWO_RESORTS);
        match parse_catalog(&doubled) {
            Err(CatalogError::DuplicateSlug(slug)) => assert_eq!(slug, "verbier"),
            other => panic!("expected duplicate slug error, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_season_is_rejected() {
        let broken = TWO_RESORTS.replace(
            r#"opening = "2025-12-13", closing = "2026-04-06""#,
            r#"opening = "2026-04-06", closing = "2025-12-13""#,
        );
        let result = parse_catalog(&broken);
        assert!(
            matches!(result, Err(CatalogError::InvalidResort { ref slug, .. }) if slug == "les-diablerets"),
            "inverted season should be rejected, got {:?}",
            result
        );
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        assert!(matches!(
            parse_catalog("[[resort]]\nslug = "),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_season_window_is_inclusive_at_both_ends() {
        let season = SeasonWindow {
            opening: date(2025, 12, 6),
            closing: date(2026, 4, 19),
        };
        assert!(season.contains(date(2025, 12, 6)));
        assert!(season.contains(date(2026, 1, 15)));
        assert!(season.contains(date(2026, 4, 19)));
        assert!(!season.contains(date(2025, 12, 5)));
        assert!(!season.contains(date(2026, 4, 20)));
    }

    #[test]
    fn test_opening_hours_switch_on_weekends() {
        let hours = OpeningHours {
            weekdays: "09:00-16:00".to_string(),
            weekends: "08:30-16:30".to_string(),
        };
        assert_eq!(hours.for_date(date(2026, 1, 16)), "09:00-16:00"); // Friday
        assert_eq!(hours.for_date(date(2026, 1, 17)), "08:30-16:30"); // Saturday
        assert_eq!(hours.for_date(date(2026, 1, 18)), "08:30-16:30"); // Sunday
    }

    #[test]
    fn test_search_matches_name_or_canton_case_insensitively() {
        let catalog = parse_catalog(TWO_RESORTS).unwrap();
        let by_name: Vec<_> = search(&catalog, "VERB").iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(by_name, vec!["verbier"]);
        let by_canton: Vec<_> = search(&catalog, " vaud ").iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(by_canton, vec!["les-diablerets"]);
        assert_eq!(search(&catalog, "").len(), 2);
        assert!(search(&catalog, "zermatt").is_empty());
    }

    #[test]
    fn test_find_resort_returns_none_for_unknown_slug() {
        let catalog = parse_catalog(TWO_RESORTS).unwrap();
        assert!(find_resort(&catalog, "verbier").is_some());
        assert!(find_resort(&catalog, "nowhere").is_none());
    }

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = default_catalog().expect("shipped catalog must parse and validate");
        assert!(catalog.len() >= 12, "shipped catalog should cover at least 12 resorts");
        for resort in &catalog {
            assert!(
                resort.slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "slug '{}' should be lowercase kebab-case",
                resort.slug
            );
        }
    }

    #[test]
    fn test_avalanche_regions_are_deduplicated() {
        let catalog = default_catalog().unwrap();
        let regions = avalanche_regions(&catalog);
        let unique: HashSet<_> = regions.iter().collect();
        assert_eq!(regions.len(), unique.len());
    }
}
