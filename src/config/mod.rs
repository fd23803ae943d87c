//! Configuration management

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no API key configured. Use --api-key, set ATTIO_API_KEY, or run `attio config set-key <key>`"
    )]
    MissingApiKey,
}

/// Main configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API key (bearer token)
    pub api_key: Option<String>,

    /// Where the API key came from, for `config show`
    pub api_key_source: Option<&'static str>,

    /// Base URL override (testing, proxies)
    pub base_url: Option<String>,

    /// Output format
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
    Quiet,
}

impl OutputFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "quiet" => Some(Self::Quiet),
            _ => None,
        }
    }
}

/// On-disk config file (`config.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
}

impl ConfigFile {
    /// Read a config file; a missing file is an empty config
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Like [`ConfigFile::read`], but a broken file is reported and ignored
    /// so `config set-key` can still overwrite it
    pub fn read_or_default(path: &Path) -> Self {
        Self::read(path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring config file: {:#}", e);
            Self::default()
        })
    }

    /// Write the config file, creating its directory
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Values given on the command line, highest precedence
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Resolve configuration: flags, then environment, then the config file
    pub fn load(overrides: Overrides) -> Result<Self> {
        let file = match Self::config_file() {
            Ok(path) => ConfigFile::read_or_default(&path),
            Err(e) => {
                tracing::debug!("No config directory: {}", e);
                ConfigFile::default()
            }
        };

        Ok(Self::resolve(
            overrides,
            |key| env::var(key).ok().filter(|v| !v.is_empty()),
            file,
        ))
    }

    fn resolve(
        overrides: Overrides,
        env_var: impl Fn(&str) -> Option<String>,
        file: ConfigFile,
    ) -> Self {
        let (api_key, api_key_source) = if let Some(key) = overrides.api_key {
            (Some(key), Some("--api-key"))
        } else if let Some(key) = env_var("ATTIO_API_KEY") {
            (Some(key), Some("ATTIO_API_KEY"))
        } else if let Some(key) = file.api_key {
            (Some(key), Some("config file"))
        } else {
            (None, None)
        };

        let output_format = overrides
            .output_format
            .or_else(|| env_var("ATTIO_OUTPUT_FORMAT").and_then(|f| OutputFormat::parse(&f)))
            .or(file.output_format)
            .unwrap_or_default();

        Self {
            api_key,
            api_key_source,
            base_url: env_var("ATTIO_BASE_URL"),
            output_format,
        }
    }

    /// The API key, or an error telling the user how to set one
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Get config directory path
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = env::var("ATTIO_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        Ok(dirs::config_dir()
            .ok_or_else(|| anyhow!("Cannot determine config directory"))?
            .join("attio"))
    }

    /// Get config file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}

/// Mask all but the last four characters of a secret
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
