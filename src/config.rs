//! Environment configuration.

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8084;
pub const DEFAULT_PAGE_SIZE: usize = 12;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub nats_url: Option<String>,
    pub backend_url: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, database_url: None, nats_url: None, backend_url: None, catalog_path: None, page_size: DEFAULT_PAGE_SIZE }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let port = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key: "PORT", value: v })?,
            None => DEFAULT_PORT,
        };
        let page_size = match get("PAGE_SIZE") {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if (1..=MAX_PAGE_SIZE).contains(&n) => n,
                _ => return Err(ConfigError::Invalid { key: "PAGE_SIZE", value: v }),
            },
            None => DEFAULT_PAGE_SIZE,
        };
        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            nats_url: get("NATS_URL"),
            backend_url: get("BACKEND_URL"),
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
            page_size,
        })
    }
}
