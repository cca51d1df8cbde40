// ABOUTME: Configuration loaded from kinopy.toml under a top-level [kinopy] table.
// ABOUTME: Covers cache location, calendar span, HTTP politeness, and per-provider settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{KinopyError, Result};
use crate::web::WebOptions;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE: &str = "kinopy.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    kinopy: Config,
}

/// Settings for a calendar build.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cache_dir: PathBuf,
    /// Number of days fetched and rendered as calendar columns, starting at the first day.
    pub days: u32,
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    pub provider: ProviderSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("kinopy_cache"),
            days: 7,
            request_delay_ms: 500,
            timeout_secs: 30,
            user_agent: None,
            provider: ProviderSettings::default(),
        }
    }
}

/// Per-provider sections. A provider that needs credentials is skipped when
/// its section is absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSettings {
    pub somerville_theatre: Option<SomervilleSettings>,
    /// Cache keys of providers to leave out entirely.
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SomervilleSettings {
    pub token: String,
}

impl Config {
    /// Read and deserialize a TOML config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| KinopyError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| KinopyError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.kinopy)
    }

    /// Load configuration with priority: CLI override > `kinopy.toml` in `dir` > defaults.
    pub fn load_with_overrides(cli_override: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = cli_override {
            return Self::load(path);
        }
        let discovered = dir.join(CONFIG_FILE);
        if discovered.exists() {
            return Self::load(&discovered);
        }
        Ok(Self::default())
    }

    pub fn is_disabled(&self, key: &str) -> bool {
        self.provider.disabled.iter().any(|k| k == key)
    }

    pub fn web_options(&self) -> WebOptions {
        let mut opts = WebOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            request_delay: Duration::from_millis(self.request_delay_ms),
            ..WebOptions::default()
        };
        if let Some(agent) = &self.user_agent {
            opts.user_agent = agent.clone();
        }
        opts
    }
}
