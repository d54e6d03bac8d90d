//! Gemini File Search client
//!
//! Thin, authenticated pass-through to the `fileSearchStores` and
//! `generateContent` endpoints of the Gemini API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::types::remote::{
    CreateStoreBody, CustomMetadata, Document, FileSearchStore, FileSearchTool,
    GenerateContentRequest, GenerateContentResponse, ListDocumentsResponse,
    ListFileSearchStoresResponse, Content, Operation, QueryDocumentBody, RemoteErrorBody, Tool,
    UploadMetadata,
};

use super::file_search::{DocumentQuery, FileSearchProvider, SearchQuery, UploadDocument};

const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Gemini API client; one instance (and one connection pool) per process
pub struct GeminiFileSearchClient {
    http: reqwest::Client,
    base_url: String,
    api_version: String,
}

impl GeminiFileSearchClient {
    /// Create a new client, failing when the API key is missing
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config.api_key()?;

        let mut key = HeaderValue::from_str(api_key).map_err(|_| {
            Error::Config("GEMINI_API_KEY contains characters not valid in a header".to_string())
        })?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        })
    }

    /// REST endpoint for a resource path
    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.api_version, path)
    }

    /// Media upload endpoint for a resource path
    fn upload_url(&self, path: &str) -> String {
        format!("{}/upload/{}/{}", self.base_url, self.api_version, path)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        check_status(request.send().await?).await?;
        Ok(())
    }
}

/// Turn a non-success response into an error carrying the remote message
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(remote_error(status.as_u16(), &body))
}

/// Map a remote error status and body onto the error taxonomy
pub(crate) fn remote_error(status: u16, body: &str) -> Error {
    let parsed = serde_json::from_str::<RemoteErrorBody>(body)
        .ok()
        .map(|b| b.error);

    let message = parsed
        .as_ref()
        .and_then(|e| e.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                format!("Remote service returned HTTP {}", status)
            } else {
                body.to_string()
            }
        });

    let not_found = status == 404
        || parsed.as_ref().and_then(|e| e.status.as_deref()) == Some("NOT_FOUND");

    if not_found {
        Error::NotFound(message)
    } else {
        Error::remote(status, message)
    }
}

/// Convert a metadata map into the wire list; empty maps send nothing
pub fn custom_metadata(metadata: &BTreeMap<String, String>) -> Option<Vec<CustomMetadata>> {
    if metadata.is_empty() {
        return None;
    }
    Some(
        metadata
            .iter()
            .map(|(key, value)| CustomMetadata::string(key, value))
            .collect(),
    )
}

/// Advance a listing cursor; a token the remote already handed out ends the listing
fn next_page_token(token: Option<String>, seen: &mut HashSet<String>) -> Option<String> {
    let token = token.filter(|t| !t.is_empty())?;
    if seen.insert(token.clone()) {
        Some(token)
    } else {
        tracing::warn!("Remote repeated page token '{}', stopping pagination", token);
        None
    }
}

/// Model resource path, accepting both "gemini-x" and "models/gemini-x"
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[async_trait]
impl FileSearchProvider for GeminiFileSearchClient {
    async fn create_store(&self, display_name: Option<&str>) -> Result<FileSearchStore> {
        let body = CreateStoreBody {
            display_name: display_name
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        };
        tracing::info!("Creating file search store (display_name: {:?})", body.display_name);

        let store: FileSearchStore = self
            .send_json(self.http.post(self.url("fileSearchStores")).json(&body))
            .await?;

        tracing::info!("Created store {}", store.name);
        Ok(store)
    }

    async fn list_stores(&self, page_size: u32) -> Result<Vec<FileSearchStore>> {
        let mut stores = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut request = self
                .http
                .get(self.url("fileSearchStores"))
                .query(&[("pageSize", page_size.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListFileSearchStoresResponse = self.send_json(request).await?;
            stores.extend(page.file_search_stores);

            match next_page_token(page.next_page_token, &mut seen_tokens) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!("Listed {} stores", stores.len());
        Ok(stores)
    }

    async fn get_store(&self, name: &str) -> Result<FileSearchStore> {
        self.send_json(self.http.get(self.url(name))).await
    }

    async fn delete_store(&self, name: &str, force: bool) -> Result<()> {
        tracing::info!("Deleting store {} (force: {})", name, force);
        let mut request = self.http.delete(self.url(name));
        if force {
            request = request.query(&[("force", "true")]);
        }
        self.send_empty(request).await
    }

    async fn upload_document(&self, upload: UploadDocument) -> Result<Operation> {
        let data = tokio::fs::read(&upload.file_path).await?;
        let size = data.len();

        let metadata = UploadMetadata {
            display_name: upload.display_name.clone(),
            mime_type: upload.mime_type.clone(),
            custom_metadata: custom_metadata(&upload.metadata),
        };

        tracing::info!(
            "Uploading {} bytes to {} (display_name: {:?})",
            size,
            upload.store_name,
            upload.display_name
        );

        // Resumable protocol: open a session with the metadata, then send the bytes
        let mut start = self
            .http
            .post(self.upload_url(&format!("{}:uploadToFileSearchStore", upload.store_name)))
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string());
        if let Some(mime) = &upload.mime_type {
            start = start.header("X-Goog-Upload-Header-Content-Type", mime.as_str());
        }

        let start = check_status(start.json(&metadata).send().await?).await?;
        let session_url = start
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::remote(
                    start.status().as_u16(),
                    "Upload session URL missing from remote response",
                )
            })?;

        let finish = self
            .http
            .post(session_url)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .body(data);

        let operation: Operation = self.send_json(finish).await?;
        tracing::info!(
            "Upload accepted as operation {} (done: {:?})",
            operation.name,
            operation.done
        );
        Ok(operation)
    }

    async fn list_documents(&self, store_name: &str, page_size: u32) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut request = self
                .http
                .get(self.url(&format!("{}/documents", store_name)))
                .query(&[("pageSize", page_size.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListDocumentsResponse = self.send_json(request).await?;
            documents.extend(page.documents);

            match next_page_token(page.next_page_token, &mut seen_tokens) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!("Listed {} documents in {}", documents.len(), store_name);
        Ok(documents)
    }

    async fn get_document(&self, name: &str) -> Result<Document> {
        self.send_json(self.http.get(self.url(name))).await
    }

    async fn delete_document(&self, name: &str, force: bool) -> Result<()> {
        tracing::info!("Deleting document {} (force: {})", name, force);
        let mut request = self.http.delete(self.url(name));
        if force {
            request = request.query(&[("force", "true")]);
        }
        self.send_empty(request).await
    }

    async fn query_document(&self, name: &str, query: &DocumentQuery) -> Result<Value> {
        let body = QueryDocumentBody {
            query: query.query.clone(),
            results_count: query.results_count,
            metadata_filters: query.metadata_filters.clone().filter(|f| !f.is_empty()),
        };
        tracing::info!("Querying document {} (results_count: {})", name, body.results_count);

        self.send_json(self.http.post(self.url(&format!("{}:query", name))).json(&body))
            .await
    }

    async fn search(&self, query: &SearchQuery) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(query.query.as_str())],
            tools: vec![Tool {
                file_search: FileSearchTool {
                    file_search_store_names: query.store_names.clone(),
                    metadata_filter: query
                        .metadata_filter
                        .clone()
                        .filter(|f| !f.trim().is_empty()),
                },
            }],
        };

        tracing::info!(
            "Searching {} store(s) with {}",
            query.store_names.len(),
            query.model
        );

        let endpoint = self.url(&format!("{}:generateContent", model_path(&query.model)));
        self.send_json(self.http.post(endpoint).json(&request)).await
    }

    async fn get_operation(&self, name: &str) -> Result<Operation> {
        self.send_json(self.http.get(self.url(name))).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
