//! geoip-api Library
//!
//! This module exposes the geoip-api components for use in integration tests
//! and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use application::Resolver;
pub use config::{load_config, Config};
pub use domain::entities::{GeoRecord, LocationRecord, LookupOutcome};
pub use domain::ports::{GeoDatabase, QueryError};
