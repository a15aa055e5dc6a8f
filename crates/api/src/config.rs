use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Configuration value that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{name} must be a valid {expected}, got {value:?}")]
pub struct ConfigError {
    name: &'static str,
    expected: &'static str,
    value: String,
}

/// Which document store backend to start with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Postgres(String),
    Memory,
    /// No `DATABASE_URL`: run without storage and report it in diagnostics.
    None,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL, or `memory://` for the in-process store.
    pub database_url: Option<String>,
    /// Display name reported by diagnostics.
    pub database_name: Option<String>,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// Deadline for every store call and pool acquisition.
    pub store_timeout: Duration,
    /// Request body cap in bytes.
    pub max_body_bytes: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&lookup, "PORT", 8000, "u16")?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            database_name: lookup("DATABASE_NAME").filter(|name| !name.is_empty()),
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", 10, "u32")?,
            db_min_connections: parsed(&lookup, "DB_MIN_CONNECTIONS", 1, "u32")?,
            store_timeout: Duration::from_millis(parsed(&lookup, "STORE_TIMEOUT_MS", 5000, "u64")?),
            max_body_bytes: parsed(&lookup, "MAX_BODY_BYTES", 4 * 1024 * 1024, "usize")?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_target(&self) -> StoreTarget {
        match self.database_url.as_deref() {
            None => StoreTarget::None,
            Some(url) if url.starts_with("memory") => StoreTarget::Memory,
            Some(url) => StoreTarget::Postgres(url.to_string()),
        }
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError {
            name,
            expected,
            value,
        }),
    }
}
