use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    account::Permission,
    purchasing::{
        CreatePurchaseOrder, CreateSupplier, PurchaseOrder, Supplier, UpdatePurchaseOrder,
    },
};
use services::services::{archive::ArchiveService, permissions::PermissionService};
use utils::response::ApiResponse;
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

pub async fn list_suppliers(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Supplier>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Purchasing).await?;
    let suppliers = Supplier::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(suppliers)))
}

pub async fn get_supplier(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Supplier>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Purchasing).await?;
    let supplier = Supplier::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(supplier)))
}

pub async fn create_supplier(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateSupplier>,
) -> Result<ResponseJson<ApiResponse<Supplier>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Purchasing).await?;
    let supplier = Supplier::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(supplier)))
}

pub async fn update_supplier(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateSupplier>,
) -> Result<ResponseJson<ApiResponse<Supplier>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Purchasing).await?;
    let supplier = Supplier::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(supplier)))
}

pub async fn archive_supplier(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Purchasing).await?;
    ArchiveService::archive_supplier(pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_supplier(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Purchasing).await?;
    if Supplier::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_orders(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<PurchaseOrder>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Purchasing).await?;
    let orders = PurchaseOrder::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(orders)))
}

pub async fn get_order(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<PurchaseOrder>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Purchasing).await?;
    let order = PurchaseOrder::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(order)))
}

pub async fn create_order(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreatePurchaseOrder>,
) -> Result<ResponseJson<ApiResponse<PurchaseOrder>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Purchasing).await?;
    if Supplier::find_by_id(pool, payload.supplier_id).await?.is_none() {
        return Err(ApiError::Validation("unknown supplier".to_string()));
    }
    let order = PurchaseOrder::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(order)))
}

pub async fn update_order(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdatePurchaseOrder>,
) -> Result<ResponseJson<ApiResponse<PurchaseOrder>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Purchasing).await?;
    if Supplier::find_by_id(pool, payload.supplier_id).await?.is_none() {
        return Err(ApiError::Validation("unknown supplier".to_string()));
    }
    let order = PurchaseOrder::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(order)))
}

pub async fn archive_order(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Purchasing).await?;
    if PurchaseOrder::set_archived(pool, id, true).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_order(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Purchasing).await?;
    if PurchaseOrder::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/purchasing",
        Router::new()
            .route("/suppliers", get(list_suppliers).post(create_supplier))
            .route("/suppliers/{id}", get(get_supplier).put(update_supplier))
            .route("/suppliers/{id}/archive", post(archive_supplier))
            .route("/suppliers/{id}/restore", post(restore_supplier))
            .route("/orders", get(list_orders).post(create_order))
            .route("/orders/{id}", get(get_order).put(update_order))
            .route("/orders/{id}/archive", post(archive_order))
            .route("/orders/{id}/restore", post(restore_order)),
    )
}
