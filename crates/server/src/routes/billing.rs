use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    account::Permission,
    billing::{BillingDocument, CreateBillingDocument, UpdateBillingDocument},
    client::Client,
};
use services::services::{billing::BillingService, permissions::PermissionService};
use utils::response::ApiResponse;
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

pub async fn list_documents(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<BillingDocument>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Billing).await?;
    let documents =
        BillingDocument::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(documents)))
}

pub async fn get_document(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<BillingDocument>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Billing).await?;
    let document = BillingDocument::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(document)))
}

pub async fn create_document(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateBillingDocument>,
) -> Result<ResponseJson<ApiResponse<BillingDocument>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Billing).await?;
    if Client::find_by_id(pool, payload.client_id).await?.is_none() {
        return Err(ApiError::Validation("unknown client".to_string()));
    }
    if payload.lines.is_empty() {
        return Err(ApiError::Validation(
            "a document needs at least one line".to_string(),
        ));
    }
    let document = BillingDocument::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(document)))
}

pub async fn update_document(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateBillingDocument>,
) -> Result<ResponseJson<ApiResponse<BillingDocument>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Billing).await?;
    if Client::find_by_id(pool, payload.client_id).await?.is_none() {
        return Err(ApiError::Validation("unknown client".to_string()));
    }
    let document = BillingDocument::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(document)))
}

/// Allocate the next number for the document's kind and stamp it issued.
pub async fn issue_document(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<BillingDocument>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Billing).await?;
    let document = BillingService::issue(pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(document)))
}

/// Mark an issued document paid and book the income entry.
pub async fn pay_document(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<BillingDocument>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Billing).await?;
    let document = BillingService::pay(pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(document)))
}

pub async fn archive_document(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Billing).await?;
    if BillingDocument::set_archived(pool, id, true).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_document(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Billing).await?;
    if BillingDocument::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/billing/documents",
        Router::new()
            .route("/", get(list_documents).post(create_document))
            .route("/{id}", get(get_document).put(update_document))
            .route("/{id}/issue", post(issue_document))
            .route("/{id}/pay", post(pay_document))
            .route("/{id}/archive", post(archive_document))
            .route("/{id}/restore", post(restore_document)),
    )
}
