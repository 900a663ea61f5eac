//! GeoIP Database Port
//!
//! Defines the interface for querying the read-only geolocation dataset.

use crate::domain::entities::GeoRecord;
use std::net::IpAddr;
use thiserror::Error;

/// Errors a dataset query can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The address is valid but has no record in the dataset
    #[error("Not Found")]
    AddressNotFound,
    /// Any other reader failure, with the underlying error text
    #[error("{0}")]
    Lookup(String),
}

/// Read-only handle over a loaded geolocation dataset.
///
/// This is an outbound port that abstracts the GeoIP database.
/// Implementations may use MaxMind GeoLite2, IP2Location, or other datasets.
/// The dataset is immutable for the process lifetime, so `query` is safe to
/// call concurrently from many handlers with no external locking.
pub trait GeoDatabase: Send + Sync {
    /// Look up the record covering `ip`.
    fn query(&self, ip: IpAddr) -> Result<GeoRecord, QueryError>;
}
