//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the geoip-api domain.
//! They have no external dependencies and contain only business logic.

use serde::Serialize;

/// Placeholder used for string fields the dataset has no value for.
const UNKNOWN: &str = "Unknown";

/// Raw geolocation data for a single IP, as produced by the database port.
///
/// This is the loosely populated shape of a dataset row: every field may be
/// absent. Subdivision names are ordered from least to most specific, the
/// order the dataset stores them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoRecord {
    /// Localized city name
    pub city: Option<String>,
    /// Administrative subdivisions, least specific first
    pub subdivisions: Vec<String>,
    /// Localized country name
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code (BR, US, FR, etc)
    pub iso_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA time zone name (e.g. America/Sao_Paulo)
    pub time_zone: Option<String>,
    /// Dataset-reported uncertainty radius in km
    pub accuracy_radius: Option<u16>,
}

/// Coordinate block of a resolved record.
///
/// Absent values stay absent (serialized as `null`) - numeric and time zone
/// fields are never defaulted to a placeholder string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoCoordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time_zone: Option<String>,
    pub accuracy_radius: Option<u16>,
}

/// Normalized result of a successful lookup.
///
/// Immutable once constructed. String fields fall back to `"Unknown"` when
/// the dataset has no value; the coordinate block preserves absence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    /// The requested IP, echoed verbatim
    pub ip: String,
    pub city: String,
    /// Most specific administrative subdivision (state/province)
    pub region: String,
    pub country: String,
    pub iso_code: String,
    pub location: GeoCoordinates,
}

impl LocationRecord {
    /// Normalize a raw dataset record into the response shape.
    ///
    /// The region is the last (most specific) subdivision name. City, region,
    /// country and ISO code become `"Unknown"` when the source record lacks
    /// them; latitude, longitude, time zone and accuracy radius are passed
    /// through unchanged, including absences.
    pub fn from_record(ip: &str, record: GeoRecord) -> Self {
        Self {
            ip: ip.to_string(),
            city: record.city.unwrap_or_else(|| UNKNOWN.to_string()),
            region: record
                .subdivisions
                .into_iter()
                .next_back()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            country: record.country.unwrap_or_else(|| UNKNOWN.to_string()),
            iso_code: record.iso_code.unwrap_or_else(|| UNKNOWN.to_string()),
            location: GeoCoordinates {
                latitude: record.latitude,
                longitude: record.longitude,
                time_zone: record.time_zone,
                accuracy_radius: record.accuracy_radius,
            },
        }
    }
}

/// Tagged result of resolving one IP string.
///
/// Every variant carries the verbatim input IP so batch responses stay
/// correlatable with their inputs even under partial failure.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The dataset had a record for this IP
    Resolved(LocationRecord),
    /// Valid IP, no matching record in the dataset
    NotFound { ip: String },
    /// The database was never loaded; permanent until restart
    Unavailable { ip: String },
    /// The input was not a valid IP, or the lookup itself failed
    Malformed { ip: String, detail: String },
}

impl LookupOutcome {
    /// The input IP this outcome was derived from.
    pub fn ip(&self) -> &str {
        match self {
            LookupOutcome::Resolved(record) => &record.ip,
            LookupOutcome::NotFound { ip }
            | LookupOutcome::Unavailable { ip }
            | LookupOutcome::Malformed { ip, .. } => ip,
        }
    }
}
