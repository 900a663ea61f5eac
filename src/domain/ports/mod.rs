mod geo_database;

pub use geo_database::{GeoDatabase, QueryError};
