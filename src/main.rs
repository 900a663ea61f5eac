//! geoip-api - IP geolocation lookup service
//!
//! This is the composition root that wires together all the components.

use geoip_api::adapters::inbound::ApiServer;
use geoip_api::adapters::outbound::MaxMindGeoDatabase;
use geoip_api::application::Resolver;
use geoip_api::config::{load_config, FALLBACK_DB_PATH, PRIMARY_DB_PATH};
use geoip_api::domain::ports::GeoDatabase;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!("starting geoip-api listen={}", cfg.listen_addr);

    // ===== COMPOSITION ROOT =====

    // Database handle (MaxMind). A load failure is not fatal: the service
    // starts anyway and reports every lookup as unavailable until restarted
    // with a valid database file.
    let geo_db: Option<Arc<dyn GeoDatabase>> = match &cfg.db_path {
        Some(path) => match MaxMindGeoDatabase::open(path) {
            Ok(db) => {
                tracing::info!("GeoIP database loaded from {}", path);
                Some(Arc::new(db) as Arc<dyn GeoDatabase>)
            }
            Err(e) => {
                tracing::error!("failed to load GeoIP database from {}: {:?}", path, e);
                None
            }
        },
        None => match MaxMindGeoDatabase::open_with_fallback(PRIMARY_DB_PATH, FALLBACK_DB_PATH) {
            Ok(db) => Some(Arc::new(db) as Arc<dyn GeoDatabase>),
            Err(e) => {
                tracing::error!("failed to load GeoIP database: {:?}", e);
                None
            }
        },
    };

    // Resolver over the shared handle
    let resolver = Arc::new(Resolver::new(geo_db));

    // Inbound adapter
    let server = ApiServer::new(cfg.listen_addr, resolver);

    server.run().await
}
