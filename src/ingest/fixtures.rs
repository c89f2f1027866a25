/// Representative upstream payloads for parser tests.
///
/// Trimmed copies of real responses; values are edited where a test needs
/// a specific edge case (missing columns, zero wind, unmapped ratings).

/// MeteoSwiss VQHA80 current-measurements feed. Columns used: 0 station,
/// 2 air temperature, 9 gust peak, 10 mean wind. `-` marks a missing value.
pub const METEOSWISS_CSV: &str = "\
Station/Location;Date;tre200s0;rre150z0;sre000z0;gre000z0;ure200s0;tde200s0;dkl010z0;fu3gen;fu3010z0;prestas0
ZER;202601151200;-2.3;0.0;10;340;71.2;-6.8;210;31.7;14.8;805.2
ATT;202601151200;-7.6;0.0;0;280;88.0;-9.1;270;64.1;38.2;730.0
DAV;202601151200;-4.5;0.0;10;310;65.0;-10.2;45;18.0;0.0;830.9
MVE;202601151200;-;0.0;10;330;60.0;-8.0;190;22.0;12.0;840.0
SAM;202601151200;-11.4;0.0;10;300;70.0;-14.0;90;-;-;820.4
ENG;202601151200;1.5;0.0;10;300;70.0;-3.0;90;12.0
";

/// SLF measurement API, latest measurement for one IMIS station.
pub const SLF_LATEST_JSON: &str = r#"{
    "station_code": "ZER2",
    "measure_date": "2026-01-15T11:30:00Z",
    "hs": 87.4,
    "ta": -5.2,
    "vw": 18.6,
    "dw": 240
}"#;

/// IMIS station with only a snow sensor.
pub const SLF_SNOW_ONLY_JSON: &str = r#"{
    "station_code": "SAA2",
    "measure_date": "2026-01-15T11:30:00Z",
    "hs": 142.0
}"#;

/// IMIS station reporting no snow height at all.
pub const SLF_NO_SNOW_JSON: &str = r#"{
    "station_code": "GUT2",
    "measure_date": "2026-01-15T11:30:00Z",
    "hs": null,
    "ta": -3.0
}"#;

/// Open-Meteo current conditions.
pub const OPEN_METEO_CURRENT_JSON: &str = r#"{
    "latitude": 46.02,
    "longitude": 7.75,
    "timezone": "Europe/Zurich",
    "current": {
        "time": "2026-01-15T12:00",
        "interval": 900,
        "temperature_2m": -0.4,
        "weather_code": 73,
        "wind_speed_10m": 9.7,
        "snow_depth": 0.55
    }
}"#;

/// Open-Meteo current conditions with missing snow depth and weather code.
pub const OPEN_METEO_SPARSE_JSON: &str = r#"{
    "current": {
        "temperature_2m": 3.6,
        "wind_speed_10m": 4.1,
        "snow_depth": null
    }
}"#;

/// Open-Meteo daily forecast, 8 days so truncation to 7 is observable.
pub const OPEN_METEO_DAILY_JSON: &str = r#"{
    "daily": {
        "time": ["2026-01-15", "2026-01-16", "2026-01-17", "2026-01-18",
                 "2026-01-19", "2026-01-20", "2026-01-21", "2026-01-22"],
        "weather_code": [73, 3, 1, 0, 71, 75, 45, 2],
        "temperature_2m_max": [-1.6, 0.4, 2.5, 3.1, -2.2, -4.8, 0.0, 1.0],
        "temperature_2m_min": [-8.2, -7.5, -5.0, -4.4, -9.9, -12.1, -6.0, -5.0],
        "snowfall_sum": [12.6, 0.0, 0.0, 0.0, 4.2, 21.0, 0.0, 0.0]
    }
}"#;

/// SLF bulletin feed. Region membership is given either as a `regions`
/// list or a single `regionId`, and ids are sometimes strings.
pub const BULLETINS_JSON: &str = r#"[
    {
        "regions": [4241, 4242, 4243],
        "regionName": "Zermatt area",
        "dangerRating": 3,
        "highlights": "Fresh wind slabs above 2400 m on north-facing slopes.",
        "validTime": { "startTime": "2026-01-15T17:00:00+01:00", "endTime": "2026-01-16T17:00:00+01:00" }
    },
    {
        "regionId": 5123,
        "regionName": "Davos",
        "dangerLevel": 4,
        "dangerDescription": "Widespread natural avalanches expected."
    },
    {
        "regions": ["7114", "7115"],
        "dangerRating": 9
    },
    {
        "regions": [1234],
        "regionName": "Adelboden",
        "dangerRating": 0,
        "dangerLevel": 0
    }
]"#;
