//! Configuration for the evaluator and its HTTP server.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default Gemini REST endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model identifiers tried in order until one answers.
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-pro",
    "models/gemini-1.5-flash",
    "models/gemini-1.5-pro",
];

/// Wire protocol spoken by the generative service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Generative Language API (`models/{model}:generateContent`).
    #[default]
    Gemini,
    /// OpenAI-compatible chat completions.
    OpenAi,
}

impl Provider {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Provider::Gemini),
            "openai" | "openai-compatible" => Some(Provider::OpenAi),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Gemini => f.write_str("gemini"),
            Provider::OpenAi => f.write_str("openai"),
        }
    }
}

/// LLM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Which API protocol to use.
    #[serde(default)]
    pub provider: Provider,

    /// Base URL for the LLM API. Empty means the provider default.
    #[serde(default)]
    pub api_base: String,

    /// API key for authentication
    #[serde(default)]
    pub api_key: String,

    /// Candidate model identifiers, in priority order.
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Maximum tokens for response (optional)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for generation (optional)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_temperature() -> f32 {
    0.0
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            api_base: String::new(),
            api_key: String::new(),
            models: default_models(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl LlmConfig {
    /// Base URL with the provider default filled in.
    pub fn effective_api_base(&self) -> &str {
        match (self.provider, self.api_base.is_empty()) {
            (Provider::Gemini, true) => GEMINI_API_BASE,
            _ => &self.api_base,
        }
    }
}

/// Deployment environment. Reported by `/api/health` and selects the
/// startup hint printed when the evaluator cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,

    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            allowed_origins: Vec::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (LLM_API_KEY, LLM_MODELS, PORT, ...)
    /// 2. Config file (~/.config/rust-qa-judge/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        config.apply_env(|key| env::var(key).ok())?;

        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;

        serde_yaml::from_str(&content)
            .map_err(|e| EvalError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Override values from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("LLM_PROVIDER") {
            self.llm.provider = Provider::parse(&provider).ok_or_else(|| {
                EvalError::Config(format!(
                    "Unknown LLM_PROVIDER '{}'. Expected 'gemini' or 'openai'.",
                    provider
                ))
            })?;
        }

        if let Some(api_base) = lookup("LLM_API_BASE") {
            self.llm.api_base = api_base;
        }

        if let Some(api_key) = lookup("LLM_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.llm.api_key = api_key;
        }

        if let Some(models) = lookup("LLM_MODELS") {
            self.llm.models = split_list(&models);
        }

        if let Some(tokens) = lookup("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.llm.max_tokens = tokens;
        }

        if let Some(temp) = lookup("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.llm.temperature = temp;
        }

        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| EvalError::Config(format!("Invalid PORT '{}'", port)))?;
        }

        if let Some(environment) = lookup("APP_ENV") {
            self.server.environment = Environment::parse(&environment);
        }

        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            self.server.allowed_origins = split_list(&origins);
        }

        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.server.request_timeout_secs = secs;
        }

        Ok(())
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "rust-qa-judge")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that required configuration is present.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.is_empty() {
            return Err(EvalError::Config(
                "API key not found. Set LLM_API_KEY (or GEMINI_API_KEY) environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.models.is_empty() {
            return Err(EvalError::Config(
                "At least one model is required. Set LLM_MODELS environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.provider == Provider::OpenAi && self.llm.api_base.is_empty() {
            return Err(EvalError::Config(
                "LLM API base URL is required for the openai provider. Set LLM_API_BASE environment variable or add to config file.".to_string()
            ));
        }

        Ok(())
    }

    /// Create a config from explicit values (useful for testing).
    pub fn with_llm(
        provider: Provider,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        models: &[&str],
    ) -> Self {
        Self {
            llm: LlmConfig {
                provider,
                api_base: api_base.into(),
                api_key: api_key.into(),
                models: models.iter().map(|m| m.to_string()).collect(),
                ..Default::default()
            },
            server: ServerConfig::default(),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
