//! Document upload, listing, deletion and operation polling

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde_json::Value;
use std::collections::BTreeMap;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::providers::{
    document_name, operation_name, store_document_name, store_name, UploadDocument,
};
use crate::server::extract::{ApiPath, ApiQuery};
use crate::server::state::AppState;
use crate::types::{
    request::{DocumentLookup, ListQuery},
    response::{DocumentListResponse, DocumentSummary, MessageResponse, OperationStatus, UploadResponse},
};

/// POST /api/stores/:store_id/upload - Start ingesting a file
///
/// Returns as soon as the remote service accepts the job; completion is
/// observed by polling the returned operation.
pub async fn upload_document(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let store_name = store_name(&store_id)?;
    let mut multipart = multipart?;
    let mut file: Option<(String, NamedTempFile)> = None;
    let mut display_name: Option<String> = None;
    let mut metadata_raw: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        Error::invalid_input(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload.bin".to_string());
                let data = field.bytes().await.map_err(|e| {
                    Error::invalid_input(format!("Failed to read file: {}", e))
                })?;

                tracing::info!("Received file: {} ({} bytes)", filename, data.len());
                let temp = spool_to_temp(&filename, &data).await?;
                file = Some((filename, temp));
            }
            "display_name" => {
                let text = field.text().await.map_err(|e| {
                    Error::invalid_input(format!("Failed to read display_name: {}", e))
                })?;
                if !text.trim().is_empty() {
                    display_name = Some(text);
                }
            }
            "metadata" => {
                metadata_raw = Some(field.text().await.map_err(|e| {
                    Error::invalid_input(format!("Failed to read metadata: {}", e))
                })?);
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let (filename, temp) = file.ok_or_else(|| Error::invalid_input("Missing 'file' field"))?;
    let metadata = parse_metadata(metadata_raw.as_deref())?;

    let upload = UploadDocument {
        file_path: temp.path().to_path_buf(),
        store_name,
        display_name: Some(display_name.unwrap_or_else(|| filename.clone())),
        mime_type: mime_guess::from_path(&filename)
            .first()
            .map(|m| m.essence_str().to_string()),
        metadata,
    };

    let result = state.provider().upload_document(upload).await;

    // The spooled bytes go away whether or not the remote call succeeded
    if let Err(e) = temp.close() {
        tracing::warn!("Failed to remove temporary upload file: {}", e);
    }

    let operation = result?;
    Ok(Json(UploadResponse::from(&operation)))
}

/// Write uploaded bytes to a temporary file that keeps the original extension
async fn spool_to_temp(filename: &str, data: &[u8]) -> Result<NamedTempFile> {
    let suffix = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let temp = tempfile::Builder::new()
        .prefix("file-search-")
        .suffix(&suffix)
        .tempfile()?;
    tokio::fs::write(temp.path(), data).await?;
    Ok(temp)
}

/// Parse the `metadata` form field: a JSON object of scalar values
pub fn parse_metadata(raw: Option<&str>) -> Result<BTreeMap<String, String>> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(BTreeMap::new()),
    };

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::invalid_input(format!("metadata is not valid JSON: {}", e)))?;
    let Value::Object(map) = value else {
        return Err(Error::invalid_input("metadata must be a JSON object"));
    };

    map.into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key, s)),
            Value::Number(n) => Ok((key, n.to_string())),
            Value::Bool(b) => Ok((key, b.to_string())),
            _ => Err(Error::invalid_input(format!(
                "metadata value for '{}' must be a string, number or boolean",
                key
            ))),
        })
        .collect()
}

/// GET /api/stores/:store_id/documents - List documents in a store
pub async fn list_documents(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<String>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> Result<Json<DocumentListResponse>> {
    let documents = state
        .provider()
        .list_documents(&store_name(&store_id)?, params.page_size)
        .await?;

    Ok(Json(DocumentListResponse {
        documents: documents.iter().map(DocumentSummary::from).collect(),
    }))
}

/// GET /api/stores/documents/*document - Get a single document
///
/// The path holds a full or store-relative document name, or a bare
/// `{docId}` with the store given as `?store_id=`.
pub async fn get_document(
    State(state): State<AppState>,
    ApiPath(document): ApiPath<String>,
    ApiQuery(lookup): ApiQuery<DocumentLookup>,
) -> Result<Json<DocumentSummary>> {
    let name = document_name(&document, lookup.store_id.as_deref())?;
    let doc = state.provider().get_document(&name).await?;
    Ok(Json(DocumentSummary::from(&doc)))
}

/// DELETE /api/stores/:store_id/documents/:document_id - Delete a document and its chunks
pub async fn delete_document(
    State(state): State<AppState>,
    ApiPath((store_id, document_id)): ApiPath<(String, String)>,
) -> Result<Json<MessageResponse>> {
    let name = store_document_name(&store_id, &document_id)?;
    state.provider().delete_document(&name, true).await?;

    tracing::info!("Deleted document {}", name);
    Ok(Json(MessageResponse::new("Document deleted successfully")))
}

/// GET /api/stores/operations/*operation - Poll an upload operation once
pub async fn get_operation(
    State(state): State<AppState>,
    ApiPath(operation): ApiPath<String>,
) -> Result<Json<OperationStatus>> {
    let name = operation_name(&operation)?;
    let op = state.provider().get_operation(&name).await?;
    Ok(Json(OperationStatus::from(&op)))
}
