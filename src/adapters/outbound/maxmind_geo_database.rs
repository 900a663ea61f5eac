//! MaxMind GeoIP Database
//!
//! Implements GeoDatabase using a MaxMind GeoLite2-City database file.

use crate::domain::entities::GeoRecord;
use crate::domain::ports::{GeoDatabase, QueryError};
use anyhow::Context;
use maxminddb::{MaxMindDBError, Reader};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;

/// MaxMind database handle.
///
/// The whole file is read into memory once at construction; the reader is
/// immutable afterwards and safe to share across concurrent lookups without
/// locking. There is no reload while the process runs.
pub struct MaxMindGeoDatabase {
    reader: Reader<Vec<u8>>,
}

impl MaxMindGeoDatabase {
    /// Load a GeoLite2-City database from a file path.
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let reader = Reader::open_readfile(path)
            .with_context(|| format!("failed to open GeoIP database at {path}"))?;
        Ok(Self { reader })
    }

    /// Load the database, preferring the deployment path.
    ///
    /// Probes `primary` first (the well-known absolute path of the container
    /// deployment) and falls back to `fallback`, expected relative to the
    /// working directory. Opening can still fail after the probe, e.g. on a
    /// truncated download or a permission error.
    pub fn open_with_fallback(primary: &str, fallback: &str) -> anyhow::Result<Self> {
        let path = if Path::new(primary).exists() {
            primary
        } else {
            fallback
        };
        let db = Self::open(path)?;
        tracing::info!("GeoIP database loaded from {}", path);
        Ok(db)
    }
}

// Sparse row shapes of the GeoLite2-City format. Every field is optional;
// `names` maps locale codes to localized names.

#[derive(Debug, Deserialize)]
struct RawNamed {
    names: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    names: Option<BTreeMap<String, String>>,
    iso_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    latitude: Option<f64>,
    longitude: Option<f64>,
    time_zone: Option<String>,
    accuracy_radius: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct RawCityRow {
    city: Option<RawNamed>,
    subdivisions: Option<Vec<RawNamed>>,
    country: Option<RawCountry>,
    location: Option<RawLocation>,
}

fn english_name(names: Option<BTreeMap<String, String>>) -> Option<String> {
    names.and_then(|mut names| names.remove("en"))
}

impl GeoDatabase for MaxMindGeoDatabase {
    fn query(&self, ip: IpAddr) -> Result<GeoRecord, QueryError> {
        let row: RawCityRow = self.reader.lookup(ip).map_err(|e| match e {
            MaxMindDBError::AddressNotFoundError(_) => QueryError::AddressNotFound,
            other => QueryError::Lookup(other.to_string()),
        })?;

        let location = row.location;
        Ok(GeoRecord {
            city: row.city.and_then(|c| english_name(c.names)),
            subdivisions: row
                .subdivisions
                .unwrap_or_default()
                .into_iter()
                .filter_map(|s| english_name(s.names))
                .collect(),
            country: row
                .country
                .as_ref()
                .and_then(|c| c.names.as_ref())
                .and_then(|names| names.get("en").cloned()),
            iso_code: row.country.and_then(|c| c.iso_code),
            latitude: location.as_ref().and_then(|l| l.latitude),
            longitude: location.as_ref().and_then(|l| l.longitude),
            time_zone: location.as_ref().and_then(|l| l.time_zone.clone()),
            accuracy_radius: location.as_ref().and_then(|l| l.accuracy_radius),
        })
    }
}
