//! Configuration loading, validation, and management for BridgeTutor.
//!
//! Loads configuration from `~/.bridgetutor/config.toml` with environment
//! variable overrides. A missing file means defaults; a missing API key is
//! only reported when the caller asks for it via [`AppConfig::require_api_key`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.bridgetutor/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Model used for every tutor request
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Optional cap on tokens per LLM response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Tutor session defaults
    #[serde(default)]
    pub tutor: TutorConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4".into()
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .field("providers", &self.providers)
            .field("tutor", &self.tutor)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// How the adapt step rewrites an explanation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterStyle {
    /// General fields of expertise (physics → biology, law → finance, ...)
    #[default]
    Field,
    /// Programming languages, with side-by-side code examples
    ProgrammingLanguage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Field the learner already knows (used when the CLI gets no `--source`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_domain: Option<String>,

    /// Field the learner wants to explore (used when the CLI gets no `--target`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_domain: Option<String>,

    #[serde(default)]
    pub adapter_style: AdapterStyle,
}

impl AppConfig {
    /// Load configuration from the default path (~/.bridgetutor/config.toml).
    ///
    /// Also checks environment variables:
    /// - `BRIDGETUTOR_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `BRIDGETUTOR_PROVIDER`
    /// - `BRIDGETUTOR_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// The API key from the environment only fills a key missing from the
    /// file; provider and model overrides always win.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.is_none() {
            self.api_key = lookup("BRIDGETUTOR_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(provider) = lookup("BRIDGETUTOR_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("BRIDGETUTOR_MODEL") {
            self.default_model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".bridgetutor")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::ValidationError("default_model must not be empty".into()));
        }

        if self.max_tokens == Some(0) {
            return Err(ConfigError::ValidationError("max_tokens must be > 0".into()));
        }

        for (name, value) in [
            ("tutor.source_domain", &self.tutor.source_domain),
            ("tutor.target_domain", &self.tutor.target_domain),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!("{name} must not be empty")));
            }
        }

        Ok(())
    }

    /// The credential for the default provider.
    ///
    /// Callers check this once at startup; a missing key is fatal there
    /// rather than surfacing on the first request.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| p.api_key.as_deref())
            .or(self.api_key.as_deref())
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            max_tokens: None,
            providers: HashMap::new(),
            tutor: TutorConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No API key configured (set BRIDGETUTOR_API_KEY or OPENAI_API_KEY)")]
    MissingApiKey,
}
