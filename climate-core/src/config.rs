use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::{nasa_power, nominatim};

pub const DEFAULT_HISTORY_YEARS: u32 = 10;

/// Overrides for the remote services' base URLs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Endpoints {
    pub power_base_url: Option<String>,
    pub geocoder_base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Sent as `User-Agent`; Nominatim asks for one that identifies the app.
    pub user_agent: Option<String>,

    /// Years of history analyzed when no explicit window is given.
    pub history_years: Option<u32>,

    /// Example TOML:
    /// [endpoints]
    /// power_base_url = "https://power.larc.nasa.gov"
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| format!("climate-cli/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn history_years(&self) -> Result<u32> {
        match self.history_years.unwrap_or(DEFAULT_HISTORY_YEARS) {
            0 => Err(anyhow!(
                "history_years must be at least 1.\n\
                 Hint: run `climate configure` to fix it."
            )),
            years => Ok(years),
        }
    }

    pub fn power_base_url(&self) -> &str {
        self.endpoints.power_base_url.as_deref().unwrap_or(nasa_power::DEFAULT_BASE_URL)
    }

    pub fn geocoder_base_url(&self) -> &str {
        self.endpoints.geocoder_base_url.as_deref().unwrap_or(nominatim::DEFAULT_BASE_URL)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "climate-analyzer", "climate-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
