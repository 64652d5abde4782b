use mfl_api::client::{MFL_API_BASE, season_year};
use std::net::{AddrParseError, SocketAddr};
use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MFL_PROXY_BIND {0:?} is not a socket address: {1}")]
    InvalidBind(String, #[source] AddrParseError),
}

/// Proxy configuration, read once at startup.
///
/// A missing league id is not a startup error: every export request answers
/// 400 until the operator sets `MFL_LEAGUE_ID`.
#[derive(Debug, Clone)]
pub struct ProxySettings {
    pub league_id: Option<String>,
    pub season: String,
    pub api_base: String,
    pub bind: SocketAddr,
}

impl ProxySettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let raw_bind = get("MFL_PROXY_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = raw_bind
            .parse()
            .map_err(|e| ConfigError::InvalidBind(raw_bind.clone(), e))?;

        Ok(Self {
            league_id: get("MFL_LEAGUE_ID"),
            season: get("MFL_SEASON")
                .unwrap_or_else(|| season_year(chrono::Utc::now()).to_string()),
            api_base: get("MFL_API_BASE").unwrap_or_else(|| MFL_API_BASE.to_string()),
            bind,
        })
    }
}
