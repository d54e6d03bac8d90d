//! Configuration for the file search server

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the bind host
pub const HOST_ENV: &str = "FILE_SEARCH_HOST";
/// Environment variable overriding the bind port
pub const PORT_ENV: &str = "FILE_SEARCH_PORT";
/// Environment variable overriding the static asset directory
pub const STATIC_DIR_ENV: &str = "FILE_SEARCH_STATIC_DIR";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Gemini API configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Load configuration: defaults, then the optional TOML file, then environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.gemini.api_key = Some(key);
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.server.host = host;
        }
        if let Some(dir) = lookup(STATIC_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.server.static_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("{} must be a port number, got '{}'", PORT_ENV, port)))?;
        }
        Ok(())
    }

    /// Fail fast when the configuration cannot serve traffic
    pub fn validate(&self) -> Result<()> {
        self.gemini.api_key()?;
        if self.gemini.default_model.trim().is_empty() {
            return Err(Error::Config("gemini.default_model must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
    /// Directory served under /static, relative to the working directory
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Gemini API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; read from GEMINI_API_KEY, never written back out
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API version path segment
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Model used for search when the request names none
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Strip markdown emphasis from generated answers
    #[serde(default = "default_strip_markdown")]
    pub strip_markdown: bool,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_version() -> String {
    "v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_strip_markdown() -> bool {
    true
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            api_version: default_api_version(),
            default_model: default_model(),
            timeout_secs: default_timeout_secs(),
            strip_markdown: default_strip_markdown(),
        }
    }
}

impl GeminiConfig {
    /// The API key, or a configuration error when it is missing
    pub fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::Config(format!(
                "{} not found. Copy .env.example to .env and add your API key",
                API_KEY_ENV
            ))),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("default_model", &self.default_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("strip_markdown", &self.strip_markdown)
            .finish()
    }
}
