use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    account::Permission,
    wifi::{CreateWifiVoucher, WifiVoucher},
};
use serde::Deserialize;
use services::services::permissions::PermissionService;
use utils::response::ApiResponse;
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

#[derive(Debug, Deserialize)]
pub struct SellVoucherRequest {
    pub client_id: Option<Uuid>,
}

pub async fn list_vouchers(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<WifiVoucher>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::WifiZone).await?;
    let vouchers = WifiVoucher::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(vouchers)))
}

pub async fn get_voucher(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<WifiVoucher>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::WifiZone).await?;
    let voucher = WifiVoucher::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(voucher)))
}

pub async fn create_voucher(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateWifiVoucher>,
) -> Result<ResponseJson<ApiResponse<WifiVoucher>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::WifiZone).await?;
    if payload.code.trim().is_empty() {
        return Err(ApiError::Validation("voucher code is required".to_string()));
    }
    let voucher = WifiVoucher::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(voucher)))
}

/// Only `available` vouchers can be sold; anything else is a conflict.
pub async fn sell_voucher(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<SellVoucherRequest>,
) -> Result<ResponseJson<ApiResponse<WifiVoucher>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::WifiZone).await?;
    if WifiVoucher::find_by_id(pool, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    let voucher = WifiVoucher::mark_sold(pool, id, payload.client_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                ApiError::Conflict("voucher is not available".to_string())
            }
            other => ApiError::Database(other),
        })?;
    Ok(ResponseJson(ApiResponse::success(voucher)))
}

pub async fn expire_voucher(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::WifiZone).await?;
    if WifiVoucher::mark_expired(pool, id).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn archive_voucher(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::WifiZone).await?;
    if WifiVoucher::set_archived(pool, id, true).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_voucher(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::WifiZone).await?;
    if WifiVoucher::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/wifi/vouchers",
        Router::new()
            .route("/", get(list_vouchers).post(create_voucher))
            .route("/{id}", get(get_voucher))
            .route("/{id}/sell", post(sell_voucher))
            .route("/{id}/expire", post(expire_voucher))
            .route("/{id}/archive", post(archive_voucher))
            .route("/{id}/restore", post(restore_voucher)),
    )
}
