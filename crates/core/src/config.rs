//! Configuration management for the Sales QA service.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (`salesqa.yaml`, or the path in `SALESQA_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources take precedence over earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "salesqa.yaml";

/// Completion providers the service knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Gemini,
    Ollama,
}

impl ProviderType {
    /// Every supported provider.
    pub const ALL: [ProviderType; 2] = [ProviderType::Gemini, ProviderType::Ollama];

    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }

    /// Whether the provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Gemini)
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    pub bind: String,

    /// Path to the JSON dataset served and embedded in prompts
    pub data_file: PathBuf,

    /// Optional prompt definition overriding the built-in template
    pub prompt_file: Option<PathBuf>,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Completion provider ("gemini", "ollama")
    pub provider: String,

    /// Model identifier sent with every completion request
    pub model: String,

    /// Custom provider endpoint (provider default when unset)
    pub endpoint: Option<String>,

    /// API key for the completion provider
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    server: Option<ServerSection>,
    data: Option<DataSection>,
    llm: Option<LlmSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerSection {
    bind: Option<String>,
    cors_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataSection {
    file: Option<PathBuf>,
    prompt_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    /// Name of the environment variable holding the API key
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            data_file: PathBuf::from("dummyData.json"),
            prompt_file: None,
            config_file: None,
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            endpoint: None,
            api_key: None,
            cors_origins: vec![
                "localhost".to_string(),
                "http://localhost:3000".to_string(),
            ],
            log_level: None,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// Environment variables:
    /// - `SALESQA_CONFIG`: Path to config file
    /// - `SALESQA_BIND`: Listen address
    /// - `SALESQA_DATA_FILE`: Dataset path
    /// - `SALESQA_PROMPT_FILE`: Prompt definition override
    /// - `SALESQA_PROVIDER`: Completion provider
    /// - `SALESQA_MODEL`: Model identifier
    /// - `SALESQA_ENDPOINT`: Provider endpoint
    /// - `SALESQA_CORS_ORIGINS`: Comma-separated allowed origins
    /// - `LLM_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use salesqa_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Dataset: {:?}", config.data_file);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` for environment access.
    pub fn load_with<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = lookup("SALESQA_CONFIG").map(PathBuf::from);
        let config_path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_path.exists() {
            config = config.merge_yaml(&config_path, &lookup)?;
            config.config_file = Some(config_path);
        } else if let Some(path) = explicit {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                path
            )));
        }

        config.apply_env(&lookup);

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml<F>(&self, path: &Path, lookup: &F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(server) = config_file.server {
            if let Some(bind) = server.bind {
                result.bind = bind;
            }
            if let Some(origins) = server.cors_origins {
                result.cors_origins = origins;
            }
        }

        if let Some(data) = config_file.data {
            if let Some(file) = data.file {
                result.data_file = file;
            }
            if data.prompt_file.is_some() {
                result.prompt_file = data.prompt_file;
            }
        }

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if let Some(env_var) = llm.api_key_env {
                result.api_key = lookup(env_var.as_str());
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Environment variables override the YAML config.
    fn apply_env<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("SALESQA_BIND") {
            self.bind = bind;
        }

        if let Some(file) = lookup("SALESQA_DATA_FILE") {
            self.data_file = PathBuf::from(file);
        }

        if let Some(file) = lookup("SALESQA_PROMPT_FILE") {
            self.prompt_file = Some(PathBuf::from(file));
        }

        if let Some(provider) = lookup("SALESQA_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("SALESQA_MODEL") {
            self.model = model;
        }

        if let Some(endpoint) = lookup("SALESQA_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }

        if let Some(origins) = lookup("SALESQA_CORS_ORIGINS") {
            self.cors_origins = parse_origins(&origins);
        }

        if let Some(key) = lookup("LLM_API_KEY") {
            self.api_key = Some(key);
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over everything else.
    pub fn with_overrides(
        mut self,
        bind: Option<String>,
        data_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
    ) -> Self {
        if let Some(bind) = bind {
            self.bind = bind;
        }

        if let Some(data_file) = data_file {
            self.data_file = data_file;
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose && self.log_level.is_none() {
            self.log_level = Some("debug".to_string());
        }

        self
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = ProviderType::parse(&self.provider).ok_or_else(|| {
            let supported: Vec<&str> = ProviderType::ALL.iter().map(ProviderType::as_str).collect();
            AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                supported.join(", ")
            ))
        })?;

        if provider.requires_api_key() && self.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(AppError::Config(format!(
                "API key not found in environment variable: LLM_API_KEY (required by {})",
                provider.as_str()
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model identifier is empty".to_string()));
        }

        Ok(())
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
