//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.orgscope.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".orgscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// How many of the newest companies the dashboard lists.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_output() -> String {
    "orgscope_report.md".to_string()
}

fn default_recent_limit() -> usize {
    5
}

/// Backend (REST API) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, without the `/rest/v1` suffix.
    #[serde(default = "default_url")]
    pub url: String,

    /// Anonymous API key.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Retries after a timeout or connection failure.
    #[serde(default = "default_retries")]
    pub retries: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: String::new(),
            timeout_seconds: default_timeout(),
            retries: default_retries(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> usize {
    2
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Render empty sections with an empty-state line instead of omitting them.
    #[serde(default = "default_true")]
    pub include_empty_sections: bool,

    /// Show each slice's share next to the company distribution.
    #[serde(default = "default_true")]
    pub show_percentages: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_empty_sections: true,
            show_percentages: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from `dir/.orgscope.toml`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE);

        if path.exists() {
            Ok(Some(Self::load(&path)?))
        } else {
            Ok(None)
        }
    }

    /// Try to load configuration from the working directory.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.backend_url {
            self.backend.url = url.clone();
        }
        if let Some(ref key) = args.api_key {
            self.backend.api_key = key.clone();
        }
        if let Some(timeout) = args.timeout {
            self.backend.timeout_seconds = timeout;
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
