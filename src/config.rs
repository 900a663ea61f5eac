//! Configuration from environment variables.
//!
//! Cloud providers usually set `PORT`; everything else has a local default.

/// Absolute database path used by the container deployment.
pub const PRIMARY_DB_PATH: &str = "/data/GeoLite2-City.mmdb";
/// Fallback relative to the working directory.
pub const FALLBACK_DB_PATH: &str = "GeoLite2-City.mmdb";

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to, built from `PORT`
    pub listen_addr: String,
    /// Explicit database path override; when unset the primary/fallback
    /// probe in `main` picks the path
    pub db_path: Option<String>,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8081".to_string(),
            db_path: None,
            debug: false,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8081".to_string())
        .parse()
        .unwrap_or(8081);

    let listen_addr = format!("0.0.0.0:{port}");

    let db_path = std::env::var("GEOIP_DB_PATH").ok();

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        listen_addr,
        db_path,
        debug,
    })
}
