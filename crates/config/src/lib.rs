//! Configuration loading and validation for SevaHealth.
//!
//! Loads configuration from `sevahealth.toml` (or the path in
//! `SEVAHEALTH_CONFIG`) with environment variable overrides. Validates all
//! settings at startup so a bad deployment fails before serving traffic.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `sevahealth.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model endpoint configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Orchestration loop configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// Dataset and document index paths
    #[serde(default)]
    pub data: DataConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Model endpoint settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key for the model endpoint (env override: GEMINI_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat model
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model (document index)
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-invocation timeout in seconds
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_embed_model() -> String {
    "gemini-embedding-001".into()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_temperature() -> f32 {
    0.0
}
fn default_model_timeout() -> u64 {
    120
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            embed_model: default_embed_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            timeout_secs: default_model_timeout(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("embed_model", &self.embed_model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Orchestration loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum model invocations per turn before the loop guard trips
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Per-tool-call timeout in seconds
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,

    /// Override the bundled system primer with the contents of this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_path: Option<String>,
}

fn default_max_iterations() -> u32 {
    25
}
fn default_tool_timeout() -> u64 {
    30
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tool_timeout_secs: default_tool_timeout(),
            system_prompt_path: None,
        }
    }
}

/// Dataset and document index paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Hospital directory (JSON array of enriched hospital records)
    #[serde(default = "default_hospitals_path")]
    pub hospitals_path: String,

    /// Pincode→coordinate table (JSON array)
    #[serde(default = "default_pincodes_path")]
    pub pincodes_path: String,

    /// Prebuilt document index file (optional; serve runs without it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<String>,

    /// Directory of source documents for index building
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_dir: Option<String>,
}

fn default_hospitals_path() -> String {
    "data/hospitals.json".into()
}
fn default_pincodes_path() -> String {
    "data/pincodes.json".into()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            hospitals_path: default_hospitals_path(),
            pincodes_path: default_pincodes_path(),
            index_path: None,
            docs_dir: None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum retained threads before idle eviction kicks in
    #[serde(default = "default_session_capacity")]
    pub session_capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8001
}
fn default_session_capacity() -> usize {
    1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_capacity: default_session_capacity(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path.
    ///
    /// `SEVAHEALTH_CONFIG` names the file; otherwise `sevahealth.toml` in
    /// the working directory. Environment overrides applied afterwards:
    /// - `GEMINI_API_KEY` / `GOOGLE_API_KEY` — model API key
    /// - `SEVAHEALTH_MODEL` — chat model
    /// - `SEVAHEALTH_HOST` / `SEVAHEALTH_PORT` — bind address
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("SEVAHEALTH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("sevahealth.toml"));
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.model.api_key.is_none() {
            config.model.api_key = std::env::var("GEMINI_API_KEY")
                .ok()
                .or_else(|| std::env::var("GOOGLE_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("SEVAHEALTH_MODEL") {
            config.model.model = model;
        }

        if let Ok(host) = std::env::var("SEVAHEALTH_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("SEVAHEALTH_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::ValidationError(format!("invalid SEVAHEALTH_PORT: {port}")))?;
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

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.temperature < 0.0 || self.model.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "model.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be at least 1".into(),
            ));
        }

        if self.model.timeout_secs == 0 || self.agent.tool_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be at least 1 second".into(),
            ));
        }

        if self.server.session_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "server.session_capacity must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if a model API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.model.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
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
}
