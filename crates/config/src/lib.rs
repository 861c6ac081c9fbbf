//! Configuration loading, validation, and management for deskwren.
//!
//! Loads configuration from `~/.deskwren/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.deskwren/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Anthropic API key. Required before the agent can be constructed;
    /// usually supplied via `ANTHROPIC_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used for answer generation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens per generated answer.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Generation temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Directory of knowledge `.txt` files, one topic per file.
    #[serde(default = "default_knowledge_dir")]
    pub knowledge_dir: PathBuf,

    /// Where `quit` / `export` writes the conversation log.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// How many documents a query retrieves at most.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// How many recent exchanges the prompt carries.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}
fn default_max_tokens() -> u32 {
    300
}
fn default_temperature() -> f32 {
    0.7
}
fn default_knowledge_dir() -> PathBuf {
    PathBuf::from("knowledge_base")
}
fn default_log_path() -> PathBuf {
    PathBuf::from("conversation_logs.json")
}
fn default_top_k() -> usize {
    3
}
fn default_history_window() -> usize {
    3
}

/// Redact a secret string for Debug output.
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
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("knowledge_dir", &self.knowledge_dir)
            .field("log_path", &self.log_path)
            .field("top_k", &self.top_k)
            .field("history_window", &self.history_window)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            knowledge_dir: default_knowledge_dir(),
            log_path: default_log_path(),
            top_k: default_top_k(),
            history_window: default_history_window(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.deskwren/config.toml).
    ///
    /// Also checks environment variables for the API key:
    /// - `DESKWREN_API_KEY` (highest priority)
    /// - `ANTHROPIC_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("DESKWREN_API_KEY")
                .ok()
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("DESKWREN_MODEL") {
            config.model = model;
        }

        if let Ok(dir) = std::env::var("DESKWREN_KNOWLEDGE_DIR") {
            config.knowledge_dir = PathBuf::from(dir);
        }

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

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".deskwren")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be greater than 0".into(),
            ));
        }

        if self.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "top_k must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The API key, or a `MissingApiKey` error with remediation text.
    ///
    /// The agent must not be constructed without a key, so callers check
    /// this once at startup.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
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

    #[error("No API key configured. Set ANTHROPIC_API_KEY or add api_key to config.toml")]
    MissingApiKey,
}
