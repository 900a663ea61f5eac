mod maxmind_geo_database;

pub use maxmind_geo_database::MaxMindGeoDatabase;
