// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::watermark::{
    FontBook, FontSettings, Locale, LogoFetcher, StyleCatalog, WatermarkEngine, WatermarkError,
    WatermarkStyle,
};

pub mod logging;
pub mod logo;
pub mod output;
pub mod storage;

pub use logging::{LogFormat, LoggingConfig};
pub use logo::LogoConfig;
pub use output::OutputConfig;
pub use storage::StorageConfig;

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration. Every section is optional; an empty document
/// yields the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub fonts: FontSettings,
    pub logo: LogoConfig,
    pub output: OutputConfig,
    pub locale: Locale,
    /// Extra named styles. A name matching a built-in preset replaces it.
    pub styles: HashMap<String, WatermarkStyle>,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        // Every referenced variable must exist before anything is substituted
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(ConfigError::MissingEnvVar(var_name.to_string()));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        // serde_yaml rejects an empty document, treat it as all defaults
        if substituted.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(&substituted)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logo.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "logo.timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.logo.http_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "logo.http_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        for (field, quality) in [
            ("output.jpeg_quality", self.output.jpeg_quality),
            ("output.compress_quality", self.output.compress_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 1 and 100, got {}",
                    field, quality
                )));
            }
        }

        // Style lookup is case-insensitive, so names must be unique ignoring case
        let mut seen_styles = HashSet::new();
        for name in self.styles.keys() {
            let key = name.trim().to_ascii_lowercase();
            if key.is_empty() {
                return Err(ConfigError::Invalid("Style name cannot be empty".to_string()));
            }
            if !seen_styles.insert(key) {
                return Err(ConfigError::Invalid(format!(
                    "Duplicate style name '{}' (names are case-insensitive)",
                    name
                )));
            }
        }

        if self.storage.directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.directory cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Built-in presets extended with the configured styles.
    pub fn style_catalog(&self) -> StyleCatalog {
        StyleCatalog::builtin().with_overrides(&self.styles)
    }

    /// Load fonts and build a render engine from this configuration.
    pub fn build_engine(&self) -> Result<WatermarkEngine, WatermarkError> {
        let fonts = FontBook::load(&self.fonts)?;
        let fetcher = LogoFetcher::new(self.logo.to_fetcher_config())?;

        Ok(WatermarkEngine::new(Arc::new(fonts), fetcher)
            .with_locale(self.locale)
            .with_logo_timeout(self.logo.timeout()))
    }
}
