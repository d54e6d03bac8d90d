//! API routes for the file search server

pub mod documents;
pub mod query;
pub mod stores;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Store management
        .route("/stores", post(stores::create_store).get(stores::list_stores))
        .route(
            "/stores/:store_id",
            get(stores::get_store).delete(stores::delete_store),
        )
        // Documents - upload with larger body limit
        .route(
            "/stores/:store_id/upload",
            post(documents::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/stores/:store_id/documents", get(documents::list_documents))
        .route(
            "/stores/:store_id/documents/:document_id",
            delete(documents::delete_document),
        )
        .route("/stores/documents/*document", get(documents::get_document))
        // Upload operation polling
        .route("/stores/operations/*operation", get(documents::get_operation))
        // Query
        .route("/query", post(query::search))
        .route("/query/document/*document", post(query::query_document))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "file-search",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Dashboard and REST facade over Gemini File Search",
        "endpoints": {
            "POST /api/stores": "Create a store",
            "GET /api/stores": "List stores",
            "GET /api/stores/:id": "Get a store with document counts",
            "DELETE /api/stores/:id?force=": "Delete a store (force cascades to documents)",
            "POST /api/stores/:id/upload": "Upload a document (multipart: file, display_name, metadata)",
            "GET /api/stores/:id/documents": "List documents in a store",
            "GET /api/stores/documents/*name": "Get a document by full or store-relative name",
            "DELETE /api/stores/:id/documents/:doc": "Delete a document",
            "GET /api/stores/operations/*name": "Poll an upload operation",
            "POST /api/query": "Search stores and return an answer with citations",
            "POST /api/query/document/*name": "Raw scored chunks from one document"
        }
    }))
}
