//! Configuration management using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::{AnalysisParams, DEFAULT_IMPRESSION_THRESHOLD, DEFAULT_MAX_KEYWORDS};
use crate::llm::{LlmConfig, Tone};
use crate::scrapers::ScrapeConfig;

/// Name used for config file discovery (`metarewrite.toml`, `.yaml`, `.json`, ...).
pub const CONFIG_NAME: &str = "metarewrite";

/// Default CTR reference line in percent. Reported only, never used by the rules.
pub const DEFAULT_CTR_THRESHOLD: f64 = 1.0;

/// Keyword analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Impressions needed for the Ghost tier and for every action rule.
    #[serde(default = "default_impression_threshold")]
    pub impression_threshold: u64,
    /// CTR reference line in percent.
    #[serde(default = "default_ctr_threshold")]
    pub ctr_threshold: f64,
    /// Keywords kept per page summary.
    #[serde(default = "default_max_keywords")]
    pub max_keywords_per_page: usize,
    /// Default writing tone.
    #[serde(default)]
    pub tone: Tone,
}

fn default_impression_threshold() -> u64 {
    DEFAULT_IMPRESSION_THRESHOLD
}

fn default_ctr_threshold() -> f64 {
    DEFAULT_CTR_THRESHOLD
}

fn default_max_keywords() -> usize {
    DEFAULT_MAX_KEYWORDS
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            impression_threshold: default_impression_threshold(),
            ctr_threshold: default_ctr_threshold(),
            max_keywords_per_page: default_max_keywords(),
            tone: Tone::default(),
        }
    }
}

impl AnalysisSettings {
    /// Reject settings that would produce empty page summaries.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_keywords_per_page == 0 {
            return Err("analysis.max_keywords_per_page must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn params(&self) -> AnalysisParams {
        AnalysisParams {
            impression_threshold: self.impression_threshold,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    /// Path the config was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration, auto-discovering the config file.
    pub async fn load() -> Self {
        // Use prefer for file discovery, then parse with serde
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            warn!("Ignoring config file {}: {}", path.display(), e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(e) => {
                debug!("No config file found: {}", e);
                Self::default_with_env()
            }
        }
    }

    /// Defaults with environment variable overrides applied.
    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// Supports TOML, YAML and JSON based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, String> {
        let config: Self = match ext {
            "toml" => {
                toml::from_str(contents).map_err(|e| format!("Failed to parse TOML config: {}", e))
            }
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Apply environment overrides to the scrape and LLM sections.
    pub fn with_env_overrides(mut self) -> Self {
        self.scrape = self.scrape.with_env_overrides();
        self.llm = self.llm.with_env_overrides();
        self
    }

    /// Render the effective configuration as TOML. Secrets are omitted.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }
}
