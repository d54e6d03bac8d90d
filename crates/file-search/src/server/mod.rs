//! HTTP server for the file search dashboard

pub mod extract;
pub mod pages;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use state::AppState;

/// File search HTTP server
pub struct FileSearchServer {
    state: AppState,
}

impl FileSearchServer {
    /// Create a server talking to the Gemini API
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    /// Create a server from prepared state
    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let static_dir = &self.state.config().server.static_dir;
        if !static_dir.is_dir() {
            tracing::warn!(
                "Static directory {} not found; set {} or server.static_dir",
                static_dir.display(),
                crate::config::STATIC_DIR_ENV
            );
        }

        let router = self.router();

        tracing::info!("Starting file search server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        let server = &self.state.config().server;
        format!("{}:{}", server.host, server.port)
    }
}

/// Build the full application router around the given state
pub fn build_router(state: AppState) -> Router {
    let server = &state.config().server;
    let static_dir = server.static_dir.clone();
    let enable_cors = server.enable_cors;
    let max_upload_size = server.max_upload_size;

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // HTML pages
        .route("/", get(pages::dashboard))
        .route("/stores/:store_id", get(pages::store_detail))
        .nest_service("/static", ServeDir::new(static_dir))
        // JSON API
        .nest("/api", routes::api_routes(max_upload_size))
        .with_state(state)
        // Middleware layers (order matters - applied bottom to top)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
