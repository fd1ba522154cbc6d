use std::time::Duration;

use anyhow::Context;

/// Where the Postgres pool connects to.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        user: String,
        password: String,
        host: String,
        port: u16,
        name: String,
    },
}

#[derive(Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database = match get("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                user: get("DB_USER").context("DB_USER or DATABASE_URL must be set")?,
                password: get("DB_PASSWORD").unwrap_or_default(),
                host: get("DB_HOST").unwrap_or_else(|| "localhost".into()),
                port: parse_or(&get, "DB_PORT", 5432)?,
                name: get("DB_NAME").context("DB_NAME or DATABASE_URL must be set")?,
            },
        };

        Ok(Self {
            database,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&get, "APP_PORT", 80)?,
            max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
            request_timeout: Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {v:?}")),
        None => Ok(default),
    }
}
