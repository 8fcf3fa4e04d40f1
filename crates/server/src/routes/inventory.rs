use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    account::Permission,
    inventory::{CreateInventoryItem, InventoryItem},
    shop::Product,
};
use serde::Deserialize;
use services::services::permissions::PermissionService;
use utils::response::ApiResponse;
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

#[derive(Debug, Deserialize)]
pub struct AdjustQuantityRequest {
    /// Relative change; negative values draw stock down.
    pub delta: i64,
}

pub async fn list_items(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<InventoryItem>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Inventory).await?;
    let items = InventoryItem::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(items)))
}

pub async fn get_item(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<InventoryItem>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Inventory).await?;
    let item = InventoryItem::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(item)))
}

pub async fn create_item(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateInventoryItem>,
) -> Result<ResponseJson<ApiResponse<InventoryItem>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Inventory).await?;
    if Product::find_by_id(pool, payload.product_id).await?.is_none() {
        return Err(ApiError::Validation("unknown product".to_string()));
    }
    let item = InventoryItem::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(item)))
}

pub async fn update_item(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateInventoryItem>,
) -> Result<ResponseJson<ApiResponse<InventoryItem>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Inventory).await?;
    if Product::find_by_id(pool, payload.product_id).await?.is_none() {
        return Err(ApiError::Validation("unknown product".to_string()));
    }
    let item = InventoryItem::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(item)))
}

pub async fn adjust_item(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<AdjustQuantityRequest>,
) -> Result<ResponseJson<ApiResponse<InventoryItem>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Inventory).await?;
    let current = InventoryItem::find_by_id(pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    if current.quantity + payload.delta < 0 {
        return Err(ApiError::Validation(
            "adjustment would make quantity negative".to_string(),
        ));
    }
    let item = InventoryItem::adjust_quantity(pool, id, payload.delta).await?;
    Ok(ResponseJson(ApiResponse::success(item)))
}

pub async fn archive_item(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Inventory).await?;
    if InventoryItem::set_archived(pool, id, true).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_item(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Inventory).await?;
    if InventoryItem::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/inventory",
        Router::new()
            .route("/", get(list_items).post(create_item))
            .route("/{id}", get(get_item).put(update_item))
            .route("/{id}/adjust", post(adjust_item))
            .route("/{id}/archive", post(archive_item))
            .route("/{id}/restore", post(restore_item)),
    )
}
