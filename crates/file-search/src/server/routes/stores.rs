//! Store management endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::providers::store_name;
use crate::server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::state::AppState;
use crate::types::{
    request::{CreateStoreRequest, DeleteStoreQuery, ListQuery},
    response::{MessageResponse, StoreCreated, StoreListResponse, StoreSummary},
};

/// POST /api/stores - Create a new store
pub async fn create_store(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateStoreRequest>,
) -> Result<Json<StoreCreated>> {
    let store = state
        .provider()
        .create_store(request.display_name.as_deref())
        .await?;

    Ok(Json(StoreCreated::from(&store)))
}

/// GET /api/stores - List all stores
pub async fn list_stores(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> Result<Json<StoreListResponse>> {
    let stores = state.provider().list_stores(params.page_size).await?;

    Ok(Json(StoreListResponse {
        stores: stores.iter().map(StoreSummary::from).collect(),
    }))
}

/// GET /api/stores/:store_id - Get a store with metrics
pub async fn get_store(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<String>,
) -> Result<Json<StoreSummary>> {
    let store = state.provider().get_store(&store_name(&store_id)?).await?;
    Ok(Json(StoreSummary::from(&store)))
}

/// DELETE /api/stores/:store_id - Delete a store (force for cascade)
pub async fn delete_store(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<String>,
    ApiQuery(params): ApiQuery<DeleteStoreQuery>,
) -> Result<Json<MessageResponse>> {
    let name = store_name(&store_id)?;
    state.provider().delete_store(&name, params.force).await?;

    tracing::info!("Deleted store {} (force: {})", name, params.force);
    Ok(Json(MessageResponse::new("Store deleted successfully")))
}
