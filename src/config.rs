use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::providers::client::DEFAULT_URL;

const APP_NAME: &str = "folio";
const CONFIG_FILE: &str = "config.json";

/// Which backend the terminal's providers read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The folio HTTP API.
    #[default]
    Api,
    /// A GitHub account's public repositories.
    Github,
}

/// The person behind the portfolio, shown by `about` and `contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub location: Option<String>,
    pub email: String,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Developer".to_string(),
            title: "Full Stack Engineer".to_string(),
            bio: "I am a Full Stack Engineer passionate about building accessible, performant \
                  web applications.\nI enjoy solving complex problems and learning new \
                  technologies."
                .to_string(),
            location: None,
            email: "hello@example.com".to_string(),
            github: Some("github.com/developer".to_string()),
            linkedin: Some("linkedin.com/in/developer".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub profile: Profile,
    /// Base URL of the folio API, used by the `api` source.
    pub api_url: String,
    pub source: SourceKind,
    /// Account read by the `github` source.
    pub github_user: Option<String>,
    /// Freshness window for cached provider data, in seconds.
    pub cache_ttl_secs: u64,
    /// JSON file of certifications for the `github` source.
    pub certifications_path: Option<PathBuf>,
    /// Cap on transcript entries. Unbounded when unset.
    pub max_transcript_entries: Option<usize>,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            api_url: DEFAULT_URL.to_string(),
            source: SourceKind::Api,
            github_user: None,
            cache_ttl_secs: 24 * 60 * 60,
            certifications_path: None,
            max_transcript_entries: None,
        }
    }
}

impl FolioConfig {
    /// Load configuration from the user's config directory, then apply
    /// environment overrides.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let mut config = match get_config_path().and_then(|path| Self::try_load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    pub fn try_load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save the configuration to the user's config directory. Returns the path written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = get_config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `FOLIO_*` overrides from `lookup`. Unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("FOLIO_API_URL") {
            self.api_url = url;
        }
        if let Some(user) = lookup("FOLIO_GITHUB_USER") {
            self.github_user = Some(user);
        }
        if let Some(ttl) = lookup("FOLIO_CACHE_TTL_SECS") {
            match ttl.parse() {
                Ok(secs) => self.cache_ttl_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid FOLIO_CACHE_TTL_SECS: {}", ttl),
            }
        }
        if let Some(path) = lookup("FOLIO_CERTIFICATIONS") {
            self.certifications_path = Some(PathBuf::from(path));
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
