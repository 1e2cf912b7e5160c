use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Halo";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DATA_DIR_ENV: &str = "HALO_DATA_DIR";
pub const DB_PATH_ENV: &str = "HALO_DB_PATH";
pub const BIND_ADDR_ENV: &str = "HALO_BIND_ADDR";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DATABASE_FILE: &str = "halo.db";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,halo_lib=debug"
    } else {
        "info"
    }
}

/// Get the application data directory.
/// `~/Halo/` unless `HALO_DATA_DIR` is set; the working directory when no
/// home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok())
}

/// Get the SQLite database path (`HALO_DB_PATH` or `<data dir>/halo.db`).
pub fn database_path() -> PathBuf {
    match std::env::var(DB_PATH_ENV).ok().filter(|v| !v.trim().is_empty()) {
        Some(path) => PathBuf::from(path),
        None => app_data_dir().join(DATABASE_FILE),
    }
}

/// Get the address the API server listens on.
pub fn bind_addr() -> Result<SocketAddr, ConfigError> {
    parse_bind_addr(std::env::var(BIND_ADDR_ENV).ok())
}

fn data_dir_from(override_dir: Option<String>) -> PathBuf {
    match override_dir.filter(|v| !v.trim().is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME),
    }
}

fn parse_bind_addr(raw: Option<String>) -> Result<SocketAddr, ConfigError> {
    let raw = raw
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    raw.trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddr {
            value: raw.clone(),
            reason: e.to_string(),
        })
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {BIND_ADDR_ENV} '{value}': {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

/// Everything the server needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_path: database_path(),
            bind_addr: bind_addr()?,
        })
    }
}
