/// schuss_service: Swiss ski resort conditions service.
///
/// Fuses official ground stations, snow sensors and a global forecast
/// model into one reading per resort, classifies each resort's operational
/// status, and refreshes the whole catalog in rate-limited groups.
///
/// # Module structure
///
/// ```text
/// schuss_service
/// ├── model        — shared data types (PartialReading, CompositeReading, IngestError, …)
/// ├── resorts      — resort catalog: TOML loading, validation, lookup, season window
/// ├── config       — service configuration (TOML file + environment overrides)
/// ├── logging      — tracing setup and source-tagged failure logging
/// ├── ingest
/// │   ├── meteoswiss  — official ground-station feed (delimited text)
/// │   ├── slf         — snow sensor network (JSON)
/// │   ├── open_meteo  — forecast model: current conditions + 7-day forecast
/// │   ├── avalanche   — regional avalanche bulletin
/// │   ├── sources     — ResortSources seam + HTTP-backed LiveSources
/// │   └── fixtures (test only) — representative API response payloads
/// ├── fusion       — per-field resolution table and reliability grading
/// ├── alert
/// │   └── status   — operational status classification
/// └── orchestrator — grouped batch refresh, event stream, forecast lookup
/// ```

pub mod alert;
pub mod config;
pub mod fusion;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod resorts;
