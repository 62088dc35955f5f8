use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::validation::Outcome;

pub const DEFAULT_CONFIG_FILE: &str = ".commit-validator.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration loaded from .commit-validator.toml.
/// All sections are optional — the service runs with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// Base URL of the REST API, without trailing slash
    pub api_url: String,
    /// Per-call timeout for outbound requests
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GitHubConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Pull request actions that trigger validation
    pub accepted_actions: Vec<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            accepted_actions: vec!["opened".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Exact filenames that fail validation when present in a PR
    pub forbidden_files: Vec<String>,
    /// Outcome when no rule reports a violation
    pub default_outcome: Outcome,
    /// Context label attached to the commit status
    pub status_context: String,
    pub close_on_failure: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            forbidden_files: vec!["forbidden.txt".to_string()],
            default_outcome: Outcome::Pass,
            status_context: "commitvalidator".to_string(),
            close_on_failure: true,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from .commit-validator.toml in the
    /// current directory when no path is given. A missing default file yields
    /// the default config; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if config.github.token.is_none() {
            config.github.token = std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "github.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.webhook.accepted_actions.is_empty() {
            return Err(ConfigError::Invalid(
                "webhook.accepted_actions must name at least one action".to_string(),
            ));
        }
        Ok(())
    }
}
