use crate::state::app_state::{MAX_WEEK, MIN_WEEK};
use anyhow::{Context, bail};
use log::LevelFilter;
use mfl_api::brand::BrandingConfig;
use mfl_api::client::{ExportTarget, MFL_API_BASE, season_year};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum BrandingSource {
    None,
    Preset(String),
    File(String),
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub target: ExportTarget,
    pub week: u8,
    pub refresh_interval: Duration,
    pub branding: BrandingSource,
}

impl AppSettings {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; `load` passes the process environment.
    ///
    /// `MFL_PROXY_URL` routes requests through the proxy service, otherwise the
    /// export API is called directly and `MFL_LEAGUE_ID` is required.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let target = if let Some(base) = get("MFL_PROXY_URL") {
            ExportTarget::Proxy { base }
        } else {
            let Some(league_id) = get("MFL_LEAGUE_ID") else {
                bail!("MFL_LEAGUE_ID is not set (or set MFL_PROXY_URL to use the proxy)");
            };
            ExportTarget::Direct {
                base: get("MFL_API_BASE").unwrap_or_else(|| MFL_API_BASE.to_string()),
                season: get("MFL_SEASON")
                    .unwrap_or_else(|| season_year(chrono::Utc::now()).to_string()),
                league_id,
            }
        };

        let week = match get("MFL_WEEK") {
            Some(raw) => raw
                .parse::<u8>()
                .ok()
                .filter(|w| (MIN_WEEK..=MAX_WEEK).contains(w))
                .with_context(|| format!("MFL_WEEK must be a week number, got {raw:?}"))?,
            None => MIN_WEEK,
        };

        let refresh_secs = match get("MFL_REFRESH_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .with_context(|| format!("MFL_REFRESH_SECS must be a positive number, got {raw:?}"))?,
            None => DEFAULT_REFRESH_SECS,
        };

        let branding = match (get("MFL_BRANDING_JSON"), get("MFL_BRANDING")) {
            (Some(path), _) => BrandingSource::File(path),
            (None, Some(preset)) => BrandingSource::Preset(preset),
            (None, None) => BrandingSource::None,
        };

        let log_level = get("RUST_LOG").and_then(|raw| LevelFilter::from_str(&raw).ok());

        Ok(Self {
            full_screen: false,
            log_level,
            target,
            week,
            refresh_interval: Duration::from_secs(refresh_secs),
            branding,
        })
    }

    pub fn load_branding(&self) -> anyhow::Result<BrandingConfig> {
        let config = match &self.branding {
            BrandingSource::None => BrandingConfig::default(),
            BrandingSource::Preset(name) => BrandingConfig::preset(name)?,
            BrandingSource::File(path) => BrandingConfig::from_json_file(path)?,
        };
        Ok(config)
    }
}
