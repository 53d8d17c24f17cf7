use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `None` means an in-memory store (`GALAXY_DB_PATH=:memory:`).
    pub db_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("GALAXY_DB_PATH").unwrap_or_else(|| "galaxy.db".into());
        let host = lookup("GALAXY_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("invalid PORT '{}'", raw))?,
            None => 3000,
        };

        Ok(Self {
            db_path: (db_path != ":memory:").then(|| PathBuf::from(db_path)),
            host,
            port,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
