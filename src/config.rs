use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_PORTFOLIO_ID: &str = "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11";
pub const DEFAULT_LOGO_URL_TEMPLATE: &str = "https://financialmodelingprep.com/image-stock/{symbol}.png";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required when STORAGE_BACKEND is postgres")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub portfolio_id: Uuid,
    pub price_jitter_percent: f64,
    pub logo_url_template: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = parse_or(&lookup, "STORAGE_BACKEND", StorageBackend::Postgres)?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let price_jitter_percent: f64 = parse_or(&lookup, "PRICE_JITTER_PERCENT", 10.0)?;
        if !price_jitter_percent.is_finite() || !(0.0..100.0).contains(&price_jitter_percent) {
            return Err(ConfigError::Invalid {
                key: "PRICE_JITTER_PERCENT",
                value: price_jitter_percent.to_string(),
            });
        }

        Ok(Self {
            storage,
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            portfolio_id: parse_or(&lookup, "PORTFOLIO_ID", Uuid::from_u128(0xa0eebc99_9c0b_4ef8_bb6d_6bb9bd380a11))?,
            price_jitter_percent,
            logo_url_template: lookup("LOGO_URL_TEMPLATE")
                .unwrap_or_else(|| DEFAULT_LOGO_URL_TEMPLATE.to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
