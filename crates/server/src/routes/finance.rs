use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    account::Permission,
    finance::{CreateTransaction, Transaction},
};
use services::services::permissions::PermissionService;
use utils::response::ApiResponse;
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

pub async fn list_transactions(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Transaction>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Finance).await?;
    let transactions =
        Transaction::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(transactions)))
}

pub async fn get_transaction(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Transaction>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Finance).await?;
    let transaction = Transaction::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(transaction)))
}

pub async fn create_transaction(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateTransaction>,
) -> Result<ResponseJson<ApiResponse<Transaction>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Finance).await?;
    if payload.amount_cents <= 0 {
        return Err(ApiError::Validation(
            "transaction amount must be positive".to_string(),
        ));
    }
    let transaction = Transaction::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(transaction)))
}

pub async fn archive_transaction(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Finance).await?;
    if Transaction::set_archived(pool, id, true).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_transaction(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Finance).await?;
    if Transaction::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/finance/transactions",
        Router::new()
            .route("/", get(list_transactions).post(create_transaction))
            .route("/{id}", get(get_transaction))
            .route("/{id}/archive", post(archive_transaction))
            .route("/{id}/restore", post(restore_transaction)),
    )
}
