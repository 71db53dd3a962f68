use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use common::types::{ApiResponse, DemoItem, DemoItemPatch};
use tracing::info;

use crate::{errors::ApiError, state::AppState};

type ItemsResponse = Result<Json<ApiResponse<Vec<DemoItem>>>, ApiError>;

#[utoipa::path(get, path = "/api/demo", tag = "items", responses((status = 200, description = "All items, seeded on first access", body = [DemoItem]), (status = 500, description = "Storage failure")))]
pub async fn list(State(state): State<AppState>) -> ItemsResponse {
    let items = state.object.list_items().await?;
    Ok(Json(ApiResponse::ok(items)))
}

#[utoipa::path(post, path = "/api/demo", tag = "items", request_body = DemoItem, responses((status = 200, description = "Collection after insert"), (status = 400, description = "Bad Request"), (status = 409, description = "Duplicate id"), (status = 500, description = "Storage failure")))]
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<DemoItem>, JsonRejection>,
) -> ItemsResponse {
    let Json(item) = payload?;
    let items = state.object.add_item(item).await?;
    info!(count = items.len(), "item added");
    Ok(Json(ApiResponse::ok(items)))
}

#[utoipa::path(put, path = "/api/demo/{id}", tag = "items", params(("id" = String, Path, description = "Item id")), request_body = DemoItemPatch, responses((status = 200, description = "Collection after update; unknown ids are a no-op"), (status = 400, description = "Bad Request"), (status = 500, description = "Storage failure")))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DemoItemPatch>, JsonRejection>,
) -> ItemsResponse {
    let Json(patch) = payload?;
    let items = state.object.update_item(&id, patch).await?;
    Ok(Json(ApiResponse::ok(items)))
}

#[utoipa::path(delete, path = "/api/demo/{id}", tag = "items", params(("id" = String, Path, description = "Item id")), responses((status = 200, description = "Collection after delete; unknown ids are a no-op"), (status = 500, description = "Storage failure")))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ItemsResponse {
    let items = state.object.delete_item(&id).await?;
    info!(%id, count = items.len(), "item deleted");
    Ok(Json(ApiResponse::ok(items)))
}
