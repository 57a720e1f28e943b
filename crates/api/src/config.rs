use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Runtime settings for the view-category service, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `HOST`, default `0.0.0.0`.
    pub host: String,
    /// `PORT`, default `3000`.
    pub port: u16,
    /// `CORS_ORIGINS`, comma-separated, default `http://localhost:5173`.
    pub cors_origins: Vec<String>,
    /// `REQUEST_TIMEOUT_SECS`, default `30`.
    pub request_timeout_secs: u64,
    /// `SHUTDOWN_TIMEOUT_SECS`: how long the change broadcaster may take to
    /// drain once the listener stops. Default `30`.
    pub shutdown_timeout_secs: u64,
    /// `EVENT_BUS_CAPACITY`: buffered change events per subscriber before
    /// slow subscribers start lagging.
    pub event_bus_capacity: usize,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Read every setting from the environment.
    ///
    /// Panics on a malformed value; a bad deployment should not start.
    pub fn from_env() -> Self {
        let event_bus_capacity = env_or("EVENT_BUS_CAPACITY", viewcat_events::bus::DEFAULT_CAPACITY);
        assert!(event_bus_capacity > 0, "EVENT_BUS_CAPACITY must be positive");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            event_bus_capacity,
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} is invalid ({raw:?}): {e}")),
        Err(_) => default,
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
