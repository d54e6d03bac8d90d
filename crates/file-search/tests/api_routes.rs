//! Router tests against an in-memory provider

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

use file_search::{
    build_router,
    config::AppConfig,
    error::{Error, Result},
    providers::{DocumentQuery, FileSearchProvider, SearchQuery, UploadDocument},
    types::remote::{
        Candidate, Content, CustomMetadata, Document, FileSearchStore, GenerateContentResponse,
        GroundingChunk, GroundingMetadata, Operation, Part, RetrievedContext,
    },
    AppState,
};

const BOUNDARY: &str = "file-search-test-boundary";

#[derive(Debug, Clone)]
struct RecordedUpload {
    path: PathBuf,
    contents: Option<Vec<u8>>,
    store_name: String,
    display_name: Option<String>,
    mime_type: Option<String>,
    metadata: BTreeMap<String, String>,
}

#[derive(Default)]
struct FakeState {
    stores: BTreeMap<String, FileSearchStore>,
    documents: BTreeMap<String, Document>,
    operations: BTreeMap<String, Operation>,
    uploads: Vec<RecordedUpload>,
    /// Every spooled file handed to `upload_document`, accepted or not
    attempted_paths: Vec<PathBuf>,
    searches: Vec<SearchQuery>,
    next_id: u32,
}

impl FakeState {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
struct FakeProvider {
    state: Mutex<FakeState>,
}

impl FakeProvider {
    fn finish_operation(&self, name: &str) {
        let mut state = self.state.lock();
        if let Some(op) = state.operations.get_mut(name) {
            op.done = Some(true);
        }
    }

    fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.lock().uploads.clone()
    }

    fn attempted_paths(&self) -> Vec<PathBuf> {
        self.state.lock().attempted_paths.clone()
    }

    fn searches(&self) -> Vec<SearchQuery> {
        self.state.lock().searches.clone()
    }
}

#[async_trait]
impl FileSearchProvider for FakeProvider {
    async fn create_store(&self, display_name: Option<&str>) -> Result<FileSearchStore> {
        let mut state = self.state.lock();
        let id = state.next_id();
        let store = FileSearchStore {
            name: format!("fileSearchStores/store-{}", id),
            display_name: display_name.map(|s| s.to_string()),
            create_time: Some("2025-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        state.stores.insert(store.name.clone(), store.clone());
        Ok(store)
    }

    async fn list_stores(&self, _page_size: u32) -> Result<Vec<FileSearchStore>> {
        Ok(self.state.lock().stores.values().cloned().collect())
    }

    async fn get_store(&self, name: &str) -> Result<FileSearchStore> {
        self.state
            .lock()
            .stores
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Store not found: {}", name)))
    }

    async fn delete_store(&self, name: &str, force: bool) -> Result<()> {
        let mut state = self.state.lock();
        if !state.stores.contains_key(name) {
            return Err(Error::not_found(format!("Store not found: {}", name)));
        }

        let prefix = format!("{}/documents/", name);
        let has_documents = state.documents.keys().any(|k| k.starts_with(&prefix));
        if has_documents && !force {
            return Err(Error::remote(400, "Cannot delete non-empty store"));
        }

        state.documents.retain(|k, _| !k.starts_with(&prefix));
        state.stores.remove(name);
        Ok(())
    }

    async fn upload_document(&self, upload: UploadDocument) -> Result<Operation> {
        let contents = std::fs::read(&upload.file_path).ok();

        let mut state = self.state.lock();
        state.attempted_paths.push(upload.file_path.clone());
        if !state.stores.contains_key(&upload.store_name) {
            return Err(Error::not_found(format!("Store not found: {}", upload.store_name)));
        }

        let id = state.next_id();
        let doc = Document {
            name: format!("{}/documents/doc-{}", upload.store_name, id),
            display_name: upload.display_name.clone(),
            custom_metadata: Some(
                upload
                    .metadata
                    .iter()
                    .map(|(k, v)| CustomMetadata::string(k.clone(), v.clone()))
                    .collect(),
            ),
            state: Some("STATE_PENDING".to_string()),
            size_bytes: contents.as_ref().map(|c| c.len() as i64),
            mime_type: upload.mime_type.clone(),
            ..Default::default()
        };
        state.documents.insert(doc.name.clone(), doc);

        let op = Operation {
            name: format!("{}/upload/operations/op-{}", upload.store_name, id),
            done: Some(false),
            ..Default::default()
        };
        state.operations.insert(op.name.clone(), op.clone());

        state.uploads.push(RecordedUpload {
            path: upload.file_path,
            contents,
            store_name: upload.store_name,
            display_name: upload.display_name,
            mime_type: upload.mime_type,
            metadata: upload.metadata,
        });

        Ok(op)
    }

    async fn list_documents(&self, store_name: &str, _page_size: u32) -> Result<Vec<Document>> {
        let prefix = format!("{}/documents/", store_name);
        Ok(self
            .state
            .lock()
            .documents
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(_, d)| d.clone())
            .collect())
    }

    async fn get_document(&self, name: &str) -> Result<Document> {
        self.state
            .lock()
            .documents
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Document not found: {}", name)))
    }

    async fn delete_document(&self, name: &str, _force: bool) -> Result<()> {
        self.state
            .lock()
            .documents
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("Document not found: {}", name)))
    }

    async fn query_document(&self, name: &str, query: &DocumentQuery) -> Result<Value> {
        if !self.state.lock().documents.contains_key(name) {
            return Err(Error::not_found(format!("Document not found: {}", name)));
        }
        Ok(json!({
            "document": name,
            "query": query.query,
            "resultsCount": query.results_count,
            "relevantChunks": [{ "chunkRelevanceScore": 0.9, "chunk": { "data": { "stringValue": "chunk text" } } }]
        }))
    }

    async fn search(&self, query: &SearchQuery) -> Result<GenerateContentResponse> {
        self.state.lock().searches.push(query.clone());

        Ok(GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![
                        Part { text: Some("The **deadline** is ".to_string()) },
                        Part { text: Some("_Friday_.".to_string()) },
                    ],
                }),
                grounding_metadata: Some(GroundingMetadata {
                    grounding_chunks: vec![
                        GroundingChunk {
                            retrieved_context: Some(RetrievedContext {
                                title: Some("plan.pdf".to_string()),
                                uri: Some("fileSearchStores/store-1/documents/doc-2".to_string()),
                                text: Some("Due Friday".to_string()),
                            }),
                        },
                        GroundingChunk { retrieved_context: None },
                    ],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            model_version: None,
        })
    }

    async fn get_operation(&self, name: &str) -> Result<Operation> {
        self.state
            .lock()
            .operations
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Operation not found: {}", name)))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.gemini.api_key = Some("test-key".to_string());
    config
}

fn app_with(config: AppConfig) -> (Router, Arc<FakeProvider>) {
    let fake = Arc::new(FakeProvider::default());
    let router = build_router(AppState::with_provider(config, fake.clone()));
    (router, fake)
}

fn app() -> (Router, Arc<FakeProvider>) {
    app_with(test_config())
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(router, request).await;
    let value = serde_json::from_str(&body).unwrap_or(Value::Null);
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart form with an optional file part followed by text fields
fn upload_request(uri: &str, file: Option<(&str, &str)>, fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = Vec::new();

    if let Some((filename, data)) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn create_store(router: &Router, display_name: &str) -> String {
    let (status, body) = send_json(
        router,
        post_json("/api/stores", json!({ "display_name": display_name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["name"].as_str().unwrap().trim_start_matches("fileSearchStores/").to_string()
}

#[tokio::test]
async fn test_health() {
    let (router, _) = app();
    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_create_then_get_store() {
    let (router, _) = app();

    let (status, created) = send_json(
        &router,
        post_json("/api/stores", json!({ "display_name": "Team docs" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["display_name"], "Team docs");
    let name = created["name"].as_str().unwrap().to_string();
    assert!(name.starts_with("fileSearchStores/"));

    let id = name.trim_start_matches("fileSearchStores/");
    let (status, store) = send_json(&router, get(&format!("/api/stores/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store["name"], name.as_str());
    assert_eq!(store["display_name"], "Team docs");

    // Absent remote counts come back as zero
    assert_eq!(store["active_documents_count"], 0);
    assert_eq!(store["pending_documents_count"], 0);
    assert_eq!(store["failed_documents_count"], 0);
    assert_eq!(store["size_bytes"], 0);

    let (status, listed) = send_json(&router, get("/api/stores")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["stores"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_store_without_display_name() {
    let (router, _) = app();
    let (status, created) = send_json(&router, post_json("/api/stores", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["display_name"], "");
}

#[tokio::test]
async fn test_unknown_store_is_404_with_detail() {
    let (router, _) = app();
    let (status, body) = send_json(&router, get("/api/stores/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("fileSearchStores/missing"));
}

#[tokio::test]
async fn test_delete_non_empty_store_requires_force() {
    let (router, _) = app();
    let id = create_store(&router, "Docs").await;

    let (status, _) = send_json(
        &router,
        upload_request(&format!("/api/stores/{}/upload", id), Some(("a.txt", "hello")), &[]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(&router, delete(&format!("/api/stores/{}", id))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Cannot delete non-empty store");

    let (status, body) =
        send_json(&router, delete(&format!("/api/stores/{}?force=true", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Store deleted successfully");

    let (status, _) = send_json(&router, get(&format!("/api/stores/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, docs) = send_json(&router, get(&format!("/api/stores/{}/documents", id))).await;
    assert!(docs["documents"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_forwards_file_and_metadata() {
    let (router, fake) = app();
    let id = create_store(&router, "Docs").await;

    let (status, body) = send_json(
        &router,
        upload_request(
            &format!("/api/stores/{}/upload", id),
            Some(("notes.txt", "meeting notes")),
            &[("display_name", ""), ("metadata", r#"{"author": "ada", "year": 1843}"#)],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["done"], false);
    assert_eq!(body["message"], "Upload initiated");
    assert!(body["operation_name"]
        .as_str()
        .unwrap()
        .starts_with(&format!("fileSearchStores/{}/upload/operations/", id)));

    let uploads = fake.uploads();
    assert_eq!(uploads.len(), 1);
    let upload = &uploads[0];
    assert_eq!(upload.contents.as_deref(), Some(&b"meeting notes"[..]));
    assert_eq!(upload.store_name, format!("fileSearchStores/{}", id));
    assert_eq!(upload.display_name.as_deref(), Some("notes.txt"));
    assert_eq!(upload.mime_type.as_deref(), Some("text/plain"));
    assert_eq!(upload.path.extension().and_then(|e| e.to_str()), Some("txt"));
    assert_eq!(upload.metadata.get("author").map(String::as_str), Some("ada"));
    assert_eq!(upload.metadata.get("year").map(String::as_str), Some("1843"));

    // Temporary copy is gone once the request completes
    assert!(!upload.path.exists());

    let (_, docs) = send_json(&router, get(&format!("/api/stores/{}/documents", id))).await;
    let docs = docs["documents"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["state"], "STATE_PENDING");
    assert_eq!(docs[0]["custom_metadata"][0], json!({ "key": "author", "value": "ada" }));
}

#[tokio::test]
async fn test_upload_display_name_and_empty_metadata() {
    let (router, fake) = app();
    let id = create_store(&router, "Docs").await;

    let (status, _) = send_json(
        &router,
        upload_request(
            &format!("/api/stores/{}/upload", id),
            Some(("report.pdf", "%PDF-1.4")),
            &[("display_name", "Quarterly report")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let uploads = fake.uploads();
    assert_eq!(uploads[0].display_name.as_deref(), Some("Quarterly report"));
    assert_eq!(uploads[0].mime_type.as_deref(), Some("application/pdf"));
    assert!(uploads[0].metadata.is_empty());
}

#[tokio::test]
async fn test_upload_rejects_invalid_metadata() {
    let (router, fake) = app();
    let id = create_store(&router, "Docs").await;

    let (status, body) = send_json(
        &router,
        upload_request(
            &format!("/api/stores/{}/upload", id),
            Some(("notes.txt", "x")),
            &[("metadata", "{not json")],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("metadata"));
    assert!(fake.uploads().is_empty());
}

#[tokio::test]
async fn test_upload_requires_file() {
    let (router, _) = app();
    let id = create_store(&router, "Docs").await;

    let (status, _) = send_json(
        &router,
        upload_request(&format!("/api/stores/{}/upload", id), None, &[("display_name", "x")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_to_missing_store_is_404() {
    let (router, fake) = app();

    let (status, _) = send_json(
        &router,
        upload_request("/api/stores/missing/upload", Some(("a.md", "# hi")), &[]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(fake.uploads().is_empty());
}

#[tokio::test]
async fn test_failed_upload_still_removes_temp_file() {
    let (router, fake) = app();

    let (status, body) = send_json(
        &router,
        upload_request("/api/stores/missing/upload", Some(("a.md", "# hi")), &[]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("fileSearchStores/missing"));

    let attempted = fake.attempted_paths();
    assert_eq!(attempted.len(), 1);
    assert_eq!(attempted[0].extension().and_then(|e| e.to_str()), Some("md"));
    assert!(!attempted[0].exists());
}

#[tokio::test]
async fn test_operation_polling() {
    let (router, fake) = app();
    let id = create_store(&router, "Docs").await;

    let (_, upload) = send_json(
        &router,
        upload_request(&format!("/api/stores/{}/upload", id), Some(("a.txt", "a")), &[]),
    )
    .await;
    let op_name = upload["operation_name"].as_str().unwrap().to_string();

    let uri = format!("/api/stores/operations/{}", op_name);
    let (status, op) = send_json(&router, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(op["name"], op_name.as_str());
    assert_eq!(op["done"], false);
    assert!(op["error"].is_null());

    fake.finish_operation(&op_name);
    let (_, op) = send_json(&router, get(&uri)).await;
    assert_eq!(op["done"], true);

    let (status, _) = send_json(
        &router,
        get("/api/stores/operations/fileSearchStores/store-9/upload/operations/missing"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Only operations under a store are reachable
    let (status, body) = send_json(&router, get("/api/stores/operations/models%2Fgemini")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_get_and_delete_document() {
    let (router, _) = app();
    let id = create_store(&router, "Docs").await;

    send_json(
        &router,
        upload_request(&format!("/api/stores/{}/upload", id), Some(("a.txt", "a")), &[]),
    )
    .await;
    let (_, docs) = send_json(&router, get(&format!("/api/stores/{}/documents", id))).await;
    let full_name = docs["documents"][0]["name"].as_str().unwrap().to_string();
    let doc_id = full_name.rsplit('/').next().unwrap().to_string();

    // Both the relative and the full name resolve
    let relative = format!("/api/stores/documents/{}/documents/{}", id, doc_id);
    let (status, doc) = send_json(&router, get(&relative)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["name"], full_name.as_str());

    let (status, _) =
        send_json(&router, get(&format!("/api/stores/documents/{}", full_name))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &router,
        delete(&format!("/api/stores/{}/documents/{}", id, doc_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Document deleted successfully");

    let (status, _) = send_json(&router, get(&relative)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_returns_stripped_text_and_citations() {
    let (router, fake) = app();

    let (status, body) = send_json(
        &router,
        post_json(
            "/api/query",
            json!({ "query": "When is it due?", "store_ids": ["store-1", "fileSearchStores/store-2"] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "The deadline is Friday.");
    assert_eq!(
        body["citations"],
        json!([{ "title": "plan.pdf", "uri": "fileSearchStores/store-1/documents/doc-2" }])
    );

    let searches = fake.searches();
    assert_eq!(searches.len(), 1);
    assert_eq!(
        searches[0].store_names,
        vec!["fileSearchStores/store-1", "fileSearchStores/store-2"]
    );
    assert_eq!(searches[0].model, "gemini-2.5-flash");
    assert!(searches[0].metadata_filter.is_none());
}

#[tokio::test]
async fn test_search_forwards_filter_and_model() {
    let (router, fake) = app();

    let (status, _) = send_json(
        &router,
        post_json(
            "/api/query",
            json!({
                "query": "q",
                "store_ids": ["store-1"],
                "metadata_filter": "author = \"ada\"",
                "model": "gemini-2.5-pro"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let searches = fake.searches();
    assert_eq!(searches[0].metadata_filter.as_deref(), Some("author = \"ada\""));
    assert_eq!(searches[0].model, "gemini-2.5-pro");
}

#[tokio::test]
async fn test_search_keeps_markdown_when_configured() {
    let mut config = test_config();
    config.gemini.strip_markdown = false;
    let (router, _) = app_with(config);

    let (status, body) = send_json(
        &router,
        post_json("/api/query", json!({ "query": "q", "store_ids": ["store-1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "The **deadline** is _Friday_.");
}

#[tokio::test]
async fn test_search_rejects_empty_input() {
    let (router, fake) = app();

    let (status, _) = send_json(
        &router,
        post_json("/api/query", json!({ "query": "q", "store_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &router,
        post_json("/api/query", json!({ "query": "  ", "store_ids": ["s"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(fake.searches().is_empty());
}

#[tokio::test]
async fn test_query_document_passthrough() {
    let (router, _) = app();
    let id = create_store(&router, "Docs").await;
    send_json(
        &router,
        upload_request(&format!("/api/stores/{}/upload", id), Some(("a.txt", "a")), &[]),
    )
    .await;
    let (_, docs) = send_json(&router, get(&format!("/api/stores/{}/documents", id))).await;
    let full_name = docs["documents"][0]["name"].as_str().unwrap().to_string();
    let relative = full_name.trim_start_matches("fileSearchStores/").to_string();

    let (status, body) = send_json(
        &router,
        post_json(
            &format!("/api/query/document/{}", relative),
            json!({ "query": "what?" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document"], full_name.as_str());
    assert_eq!(body["resultsCount"], 10);
    assert_eq!(body["relevantChunks"][0]["chunkRelevanceScore"], 0.9);
}

#[tokio::test]
async fn test_pages_render() {
    let (router, _) = app();

    let (status, html) = send(&router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Gemini File Search"));

    let (status, html) = send(&router, get("/stores/store-42")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Upload Files"));
    assert!(html.contains("store-42"));
}

#[tokio::test]
async fn test_api_info_lists_endpoints() {
    let (router, _) = app();
    let (status, body) = send_json(&router, get("/api/info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "file-search");
    assert!(body["endpoints"]["POST /api/query"].is_string());
}

fn assert_invalid_input(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    assert!(
        body["detail"].as_str().unwrap_or_default().starts_with("Invalid input"),
        "body: {}",
        body
    );
}

#[tokio::test]
async fn test_malformed_requests_are_400_with_detail() {
    let (router, fake) = app();
    let id = create_store(&router, "Docs").await;

    // Missing required field
    let (status, body) = send_json(&router, post_json("/api/query", json!({ "query": "hi" }))).await;
    assert_invalid_input(status, &body);
    assert!(body["detail"].as_str().unwrap().contains("store_ids"));

    // Truncated JSON
    let truncated = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"query": "hi", "store_ids": ["#))
        .unwrap();
    let (status, body) = send_json(&router, truncated).await;
    assert_invalid_input(status, &body);

    // JSON body without a JSON content type
    let untyped = Request::builder()
        .method("POST")
        .uri("/api/stores")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send_json(&router, untyped).await;
    assert_invalid_input(status, &body);

    // Unparseable query string
    let (status, body) = send_json(&router, delete(&format!("/api/stores/{}?force=maybe", id))).await;
    assert_invalid_input(status, &body);
    let (status, body) = send_json(&router, get("/api/stores?page_size=lots")).await;
    assert_invalid_input(status, &body);

    // Upload that is not multipart
    let (status, body) = send_json(
        &router,
        post_json(&format!("/api/stores/{}/upload", id), json!({ "file": "x" })),
    )
    .await;
    assert_invalid_input(status, &body);

    // Store untouched, nothing reached the provider
    let (status, _) = send_json(&router, get(&format!("/api/stores/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(fake.searches().is_empty());
    assert!(fake.attempted_paths().is_empty());
}

#[tokio::test]
async fn test_bare_document_id_resolves_with_store_id() {
    let (router, _) = app();
    let id = create_store(&router, "Docs").await;

    send_json(
        &router,
        upload_request(&format!("/api/stores/{}/upload", id), Some(("a.txt", "a")), &[]),
    )
    .await;
    let (_, docs) = send_json(&router, get(&format!("/api/stores/{}/documents", id))).await;
    let full_name = docs["documents"][0]["name"].as_str().unwrap().to_string();
    let doc_id = full_name.rsplit('/').next().unwrap().to_string();

    let (status, doc) = send_json(
        &router,
        get(&format!("/api/stores/documents/{}?store_id={}", doc_id, id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["name"], full_name.as_str());

    let (status, body) = send_json(&router, get(&format!("/api/stores/documents/{}", doc_id))).await;
    assert_invalid_input(status, &body);
    assert!(body["detail"].as_str().unwrap().contains("store_id"));

    let (status, result) = send_json(
        &router,
        post_json(
            &format!("/api/query/document/{}?store_id={}", doc_id, id),
            json!({ "query": "what?", "results_count": 3 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["document"], full_name.as_str());
    assert_eq!(result["resultsCount"], 3);
}

#[tokio::test]
async fn test_ids_cannot_escape_store_collection() {
    let (router, fake) = app();
    let id = create_store(&router, "Docs").await;

    let (status, body) = send_json(&router, get("/api/stores/..%2F..%2Fmodels")).await;
    assert_invalid_input(status, &body);

    let (status, body) = send_json(&router, delete("/api/stores/..%2Fother?force=true")).await;
    assert_invalid_input(status, &body);

    let (status, body) = send_json(
        &router,
        delete(&format!("/api/stores/{}/documents/..%2F..%2Fx", id)),
    )
    .await;
    assert_invalid_input(status, &body);

    let (status, body) = send_json(
        &router,
        get(&format!("/api/stores/documents/{}/documents/..", id)),
    )
    .await;
    assert_invalid_input(status, &body);

    let (status, body) = send_json(
        &router,
        post_json("/api/query", json!({ "query": "q", "store_ids": ["../../models/x"] })),
    )
    .await;
    assert_invalid_input(status, &body);

    let (status, body) = send_json(
        &router,
        upload_request("/api/stores/..%2Fx/upload", Some(("a.txt", "a")), &[]),
    )
    .await;
    assert_invalid_input(status, &body);

    assert!(fake.searches().is_empty());
    assert!(fake.attempted_paths().is_empty());
    let (status, _) = send_json(&router, get(&format!("/api/stores/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
}
