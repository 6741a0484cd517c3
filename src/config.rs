use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

// ============================================================================
// Service Configuration
// ============================================================================
//
// Everything is read from environment variables with local-dev defaults.
// A missing DATABASE_URL selects the in-memory store.
//
// ============================================================================

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_BACKUP_PATH: &str = "actions_backup.json";
pub const DEFAULT_METRICS_PORT: u16 = 9090;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Address the API server listens on
    pub bind_addr: SocketAddr,
    /// Postgres connection string; `None` runs against the in-memory store
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Fixed location of the JSON backup mirror
    pub backup_path: PathBuf,
    /// Metrics listener host; follows `bind_addr` unless METRICS_HOST is set
    pub metrics_host: IpAddr,
    pub metrics_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let bind_addr: SocketAddr = DEFAULT_BIND_ADDR
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8000)));
        Self {
            bind_addr,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            backup_path: PathBuf::from(DEFAULT_BACKUP_PATH),
            metrics_host: bind_addr.ip(),
            metrics_port: DEFAULT_METRICS_PORT,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("BIND_ADDR") {
            config.bind_addr = parse_value("BIND_ADDR", value)?;
        }

        config.metrics_host = match lookup("METRICS_HOST") {
            Some(value) => parse_value("METRICS_HOST", value)?,
            None => config.bind_addr.ip(),
        };

        config.database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        if let Some(value) = lookup("DB_MAX_CONNECTIONS") {
            config.db_max_connections = parse_value("DB_MAX_CONNECTIONS", value)?;
            if config.db_max_connections == 0 {
                return Err(ConfigError::Invalid {
                    key: "DB_MAX_CONNECTIONS",
                    value: "0".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        if let Some(value) = lookup("BACKUP_PATH") {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: "BACKUP_PATH",
                    value,
                    reason: "must not be empty".to_string(),
                });
            }
            config.backup_path = PathBuf::from(value);
        }

        if let Some(value) = lookup("METRICS_PORT") {
            config.metrics_port = parse_value("METRICS_PORT", value)?;
        }

        Ok(config)
    }

    /// Address the metrics server listens on
    pub fn metrics_addr(&self) -> SocketAddr {
        SocketAddr::new(self.metrics_host, self.metrics_port)
    }
}

fn parse_value<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
