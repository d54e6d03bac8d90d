//! Outward response schema
//!
//! Every struct here has a fixed field set; optional remote fields are
//! defaulted during normalization, never dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of POST /api/stores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreated {
    pub name: String,
    pub display_name: String,
    pub create_time: Option<String>,
}

/// Store with live metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSummary {
    pub name: String,
    pub display_name: String,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub active_documents_count: i64,
    pub pending_documents_count: i64,
    pub failed_documents_count: i64,
    pub size_bytes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreListResponse {
    pub stores: Vec<StoreSummary>,
}

/// Flattened custom metadata entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    pub display_name: String,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub state: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub custom_metadata: Vec<MetadataEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
}

/// Response of POST /api/stores/:id/upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub operation_name: String,
    pub done: bool,
    pub message: String,
}

/// Response of GET /api/stores/operations/*name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationStatus {
    pub name: String,
    pub done: bool,
    pub metadata: Option<Value>,
    pub error: Option<String>,
}

/// Source reference extracted from grounding metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub uri: String,
}

/// Response of POST /api/query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub text: String,
    pub citations: Vec<Citation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
