//! Application state for the file search server

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::providers::{FileSearchProvider, GeminiFileSearchClient};

/// Shared application state
///
/// Immutable after construction; cloning only bumps the `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Remote service client, one per process
    provider: Arc<dyn FileSearchProvider>,
}

impl AppState {
    /// Create state backed by the Gemini API
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let provider = Arc::new(GeminiFileSearchClient::new(&config.gemini)?);
        tracing::info!(
            "Gemini client initialized (default model: {}, api: {}/{})",
            config.gemini.default_model,
            config.gemini.base_url,
            config.gemini.api_version
        );
        Ok(Self::with_provider(config, provider))
    }

    /// Create state around an existing provider
    pub fn with_provider(config: AppConfig, provider: Arc<dyn FileSearchProvider>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, provider }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the remote service client
    pub fn provider(&self) -> &Arc<dyn FileSearchProvider> {
        &self.inner.provider
    }
}
