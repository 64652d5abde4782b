use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const BIZARRO_BRANDING_JSON: &str = include_str!("../assets/bizarro.json");

#[derive(Debug, thiserror::Error)]
pub enum BrandingError {
    #[error("could not read branding file {0}: {1}")]
    Read(String, #[source] std::io::Error),
    #[error("invalid branding json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown branding preset: {0}")]
    UnknownPreset(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FranchiseBrand {
    pub logo: Option<String>,
    /// Accent color as "#RRGGBB".
    pub color: Option<String>,
}

/// Per-franchise logos and accent colors, keyed by franchise id.
///
/// Passed to the normalizer explicitly; there is no global table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BrandingConfig {
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default)]
    franchises: HashMap<String, FranchiseBrand>,
}

impl BrandingConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, BrandingError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BrandingError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| BrandingError::Read(path.display().to_string(), e))?;
        Self::from_json_str(&content)
    }

    /// Built-in presets bundled with the crate.
    pub fn preset(name: &str) -> Result<Self, BrandingError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bizarro" => Self::from_json_str(BIZARRO_BRANDING_JSON),
            "" | "none" => Ok(Self::default()),
            other => Err(BrandingError::UnknownPreset(other.to_string())),
        }
    }

    pub fn with_brand(mut self, franchise_id: impl Into<String>, brand: FranchiseBrand) -> Self {
        self.franchises.insert(franchise_id.into(), brand);
        self
    }

    pub fn get(&self, franchise_id: &str) -> Option<&FranchiseBrand> {
        self.franchises.get(franchise_id)
    }

    pub fn len(&self) -> usize {
        self.franchises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.franchises.is_empty()
    }

    pub fn color(&self, franchise_id: &str) -> Option<String> {
        self.get(franchise_id).and_then(|b| b.color.clone())
    }

    /// Logo for a franchise, in order of preference:
    /// configured logo, icon from the league export, then the MFL
    /// dynamic icon URL when both base URL and league id are known.
    pub fn resolve_logo(
        &self,
        franchise_id: &str,
        league_icon: Option<&str>,
        base_url: Option<&str>,
        league_id: Option<&str>,
        year: i32,
    ) -> Option<String> {
        if let Some(logo) = self.get(franchise_id).and_then(|b| b.logo.as_deref())
            && !logo.trim().is_empty()
        {
            return Some(logo.to_string());
        }
        if let Some(icon) = league_icon
            && !icon.trim().is_empty()
        {
            return Some(icon.to_string());
        }
        match (base_url, league_id) {
            (Some(base), Some(league)) if !base.trim().is_empty() && !league.trim().is_empty() => {
                Some(templated_logo_url(base, year, league, franchise_id))
            }
            _ => None,
        }
    }
}

/// MFL serves uploaded franchise icons from a per-season dynamic path.
pub fn templated_logo_url(base_url: &str, year: i32, league_id: &str, franchise_id: &str) -> String {
    format!(
        "{}/fflnetdynamic{year}/{league_id}_franchise_icon{franchise_id}.jpg",
        base_url.trim_end_matches('/')
    )
}
