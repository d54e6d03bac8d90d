//! File search provider trait: the single gateway to the remote service

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::remote::{Document, FileSearchStore, GenerateContentResponse, Operation};

/// Prefix of every store resource name
pub const STORE_PREFIX: &str = "fileSearchStores/";

/// A single resource id segment: no separators, escapes or dot segments
fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.chars().any(|c| c != '.')
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn check_segment<'a>(kind: &str, segment: &'a str) -> Result<&'a str> {
    if valid_segment(segment) {
        Ok(segment)
    } else {
        Err(Error::invalid_input(format!("Invalid {} id: '{}'", kind, segment)))
    }
}

/// Full resource name for a store id
///
/// Accepts `{id}` or `fileSearchStores/{id}`; anything that could escape the
/// store collection is rejected.
pub fn store_name(store_id: &str) -> Result<String> {
    let id = store_id.strip_prefix(STORE_PREFIX).unwrap_or(store_id);
    Ok(format!("{}{}", STORE_PREFIX, check_segment("store", id)?))
}

/// Full resource name for a document inside a store
pub fn store_document_name(store_id: &str, document_id: &str) -> Result<String> {
    Ok(format!(
        "{}/documents/{}",
        store_name(store_id)?,
        check_segment("document", document_id)?
    ))
}

/// Full resource name for a document reference
///
/// Accepts a full name (`fileSearchStores/{id}/documents/{docId}`), the
/// relative form `{id}/documents/{docId}`, or a bare `{docId}` together with
/// the id of the store that holds it.
pub fn document_name(reference: &str, store_id: Option<&str>) -> Result<String> {
    let reference = reference.trim_start_matches('/');
    let relative = reference.strip_prefix(STORE_PREFIX).unwrap_or(reference);

    match relative.split_once("/documents/") {
        Some((store, document)) => store_document_name(store, document),
        None if relative.contains('/') => Err(Error::invalid_input(format!(
            "Invalid document name: '{}'",
            reference
        ))),
        None => match store_id.filter(|s| !s.is_empty()) {
            Some(store) => store_document_name(store, relative),
            None => Err(Error::invalid_input(
                "A bare document id needs the store_id query parameter",
            )),
        },
    }
}

/// Validated operation resource name under a store
pub fn operation_name(reference: &str) -> Result<String> {
    let name = reference.trim_start_matches('/');
    let valid = name.starts_with(STORE_PREFIX) && name.split('/').all(valid_segment);
    if valid {
        Ok(name.to_string())
    } else {
        Err(Error::invalid_input(format!("Invalid operation name: '{}'", name)))
    }
}

/// Everything needed to upload one local file into a store
#[derive(Debug, Clone)]
pub struct UploadDocument {
    /// Local file holding the bytes; owned by the caller
    pub file_path: PathBuf,
    /// Target store resource name
    pub store_name: String,
    pub display_name: Option<String>,
    pub mime_type: Option<String>,
    /// Custom metadata; an empty map sends no metadata at all
    pub metadata: BTreeMap<String, String>,
}

/// Scored retrieval against a single document
#[derive(Debug, Clone)]
pub struct DocumentQuery {
    pub query: String,
    pub results_count: u32,
    pub metadata_filters: Option<Vec<Value>>,
}

/// Grounded generation across one or more stores
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub query: String,
    pub store_names: Vec<String>,
    pub metadata_filter: Option<String>,
    pub model: String,
}

/// Trait for the remote document-search service
///
/// Implementations:
/// - `GeminiFileSearchClient`: Gemini API over HTTPS
///
/// Every method surfaces remote failures verbatim; nothing here retries.
#[async_trait]
pub trait FileSearchProvider: Send + Sync {
    /// Create a store; an absent display name sends an empty config
    async fn create_store(&self, display_name: Option<&str>) -> Result<FileSearchStore>;

    /// List every store, fetching `page_size` per remote page
    async fn list_stores(&self, page_size: u32) -> Result<Vec<FileSearchStore>>;

    /// Get a store with live metrics
    async fn get_store(&self, name: &str) -> Result<FileSearchStore>;

    /// Delete a store; fails on a non-empty store unless `force` is set
    async fn delete_store(&self, name: &str, force: bool) -> Result<()>;

    /// Start ingesting a local file; returns as soon as the job is accepted
    async fn upload_document(&self, upload: UploadDocument) -> Result<Operation>;

    /// List every document in a store
    async fn list_documents(&self, store_name: &str, page_size: u32) -> Result<Vec<Document>>;

    /// Get a single document
    async fn get_document(&self, name: &str) -> Result<Document>;

    /// Delete a document, cascading to its chunks when `force` is set
    async fn delete_document(&self, name: &str, force: bool) -> Result<()>;

    /// Raw scored chunks from one document
    async fn query_document(&self, name: &str, query: &DocumentQuery) -> Result<Value>;

    /// Generated answer grounded in the given stores
    async fn search(&self, query: &SearchQuery) -> Result<GenerateContentResponse>;

    /// Poll a long-running operation once
    async fn get_operation(&self, name: &str) -> Result<Operation>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
