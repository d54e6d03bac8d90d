//! Query endpoints: grounded search with citations and single-document retrieval

use axum::{extract::State, Json};
use serde_json::Value;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::normalize::normalize_search;
use crate::providers::{document_name, store_name, DocumentQuery, SearchQuery};
use crate::server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::state::AppState;
use crate::types::{
    request::{DocumentLookup, QueryDocumentRequest, SearchRequest},
    response::SearchResponse,
};

/// POST /api/query - Search stores and answer with citations
pub async fn search(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let start = Instant::now();

    if request.query.trim().is_empty() {
        return Err(Error::invalid_input("query must not be empty"));
    }
    if request.store_ids.is_empty() {
        return Err(Error::invalid_input("store_ids must name at least one store"));
    }

    let gemini = &state.config().gemini;
    let model = request
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| gemini.default_model.clone());

    tracing::info!("Query: \"{}\" over {} store(s)", request.query, request.store_ids.len());

    let store_names = request
        .store_ids
        .iter()
        .map(|id| store_name(id))
        .collect::<Result<Vec<_>>>()?;

    let query = SearchQuery {
        query: request.query,
        store_names,
        metadata_filter: request.metadata_filter,
        model,
    };

    let response = state.provider().search(&query).await?;
    let result = normalize_search(&response, gemini.strip_markdown);

    tracing::info!(
        "Query completed in {}ms, {} citations",
        start.elapsed().as_millis(),
        result.citations.len()
    );

    Ok(Json(result))
}

/// POST /api/query/document/*document - Raw scored chunks from one document
///
/// Document references resolve as for GET /api/stores/documents/*document.
pub async fn query_document(
    State(state): State<AppState>,
    ApiPath(document): ApiPath<String>,
    ApiQuery(lookup): ApiQuery<DocumentLookup>,
    ApiJson(request): ApiJson<QueryDocumentRequest>,
) -> Result<Json<Value>> {
    if request.query.trim().is_empty() {
        return Err(Error::invalid_input("query must not be empty"));
    }
    let name = document_name(&document, lookup.store_id.as_deref())?;

    let query = DocumentQuery {
        query: request.query,
        results_count: request.results_count,
        metadata_filters: request.metadata_filters,
    };

    let result = state
        .provider()
        .query_document(&name, &query)
        .await?;

    Ok(Json(result))
}
