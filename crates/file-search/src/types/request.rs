//! Inbound HTTP request types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of POST /api/stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStoreRequest {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Query string for list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

/// Query string for DELETE /api/stores/:id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteStoreQuery {
    /// Cascade-delete contained documents
    #[serde(default)]
    pub force: bool,
}

/// Body of POST /api/query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Question to answer
    pub query: String,
    /// Store ids (the part after "fileSearchStores/")
    pub store_ids: Vec<String>,
    /// Metadata filter expression, e.g. `author = "x"`
    #[serde(default)]
    pub metadata_filter: Option<String>,
    /// Model override; the configured default applies when absent
    #[serde(default)]
    pub model: Option<String>,
}

/// Body of POST /api/query/document/*doc
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDocumentRequest {
    pub query: String,
    #[serde(default = "default_results_count")]
    pub results_count: u32,
    /// Raw MetadataFilter objects, forwarded unchanged
    #[serde(default)]
    pub metadata_filters: Option<Vec<Value>>,
}

fn default_results_count() -> u32 {
    10
}

/// Query string for document lookups by bare id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentLookup {
    /// Store holding the document when the path carries only `{docId}`
    #[serde(default)]
    pub store_id: Option<String>,
}
