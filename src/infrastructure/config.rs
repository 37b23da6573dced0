use chrono::Duration;
use std::env;
use std::time::Duration as StdDuration;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8787";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: StdDuration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    /// `None` selects the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// Empty allows any origin.
    pub cors_allowed_origins: Vec<String>,
    /// Largest accepted request body; bigger ones get 413.
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_hours = parse_or(&var, "TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        if token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_HOURS",
                value: token_ttl_hours.to_string(),
            });
        }

        let max_body_bytes = parse_or(&var, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;
        if max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_BODY_BYTES",
                value: max_body_bytes.to_string(),
            });
        }

        let database = match var("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(
                    &var,
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
                acquire_timeout: StdDuration::from_secs(parse_or(
                    &var,
                    "DATABASE_ACQUIRE_TIMEOUT_SECS",
                    DEFAULT_ACQUIRE_TIMEOUT_SECS,
                )?),
            }),
            None => None,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            database,
            jwt_secret,
            token_ttl: Duration::hours(token_ttl_hours),
            cors_allowed_origins,
            max_body_bytes,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
