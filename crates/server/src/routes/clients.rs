use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    account::Permission,
    client::{Client, CreateClient, UpdateClient},
};
use services::services::{archive::ArchiveService, permissions::PermissionService};
use utils::{contact, response::ApiResponse};
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

/// Reject a create/update whose email or phone collides with another
/// non-archived client. Comparison is on the normalized forms.
async fn check_duplicate_contact(
    pool: &sqlx::SqlitePool,
    email: Option<&str>,
    phone: Option<&str>,
    exclude_id: Option<Uuid>,
) -> Result<(), ApiError> {
    let email = email.map(contact::normalize_email).filter(|e| !e.is_empty());
    let phone = phone.map(contact::normalize_phone).filter(|p| !p.is_empty());
    if email.is_none() && phone.is_none() {
        return Ok(());
    }
    let existing = Client::find_all(pool, false).await?;
    for other in existing {
        if Some(other.id) == exclude_id {
            continue;
        }
        if let (Some(candidate), Some(theirs)) = (&email, &other.email) {
            if *candidate == contact::normalize_email(theirs) {
                return Err(ApiError::Conflict(format!(
                    "email already used by client '{}'",
                    other.name
                )));
            }
        }
        if let (Some(candidate), Some(theirs)) = (&phone, &other.phone) {
            if *candidate == contact::normalize_phone(theirs) {
                return Err(ApiError::Conflict(format!(
                    "phone already used by client '{}'",
                    other.name
                )));
            }
        }
    }
    Ok(())
}

pub async fn list_clients(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Client>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Clients).await?;
    let clients = Client::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(clients)))
}

pub async fn get_client(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Clients).await?;
    let client = Client::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(client)))
}

pub async fn create_client(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateClient>,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Clients).await?;
    check_duplicate_contact(pool, payload.email.as_deref(), payload.phone.as_deref(), None).await?;
    let client = Client::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(client)))
}

pub async fn update_client(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateClient>,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Clients).await?;
    check_duplicate_contact(
        pool,
        payload.email.as_deref(),
        payload.phone.as_deref(),
        Some(id),
    )
    .await?;
    let client = Client::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(client)))
}

pub async fn archive_client(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Clients).await?;
    ArchiveService::archive_client(pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_client(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Clients).await?;
    if Client::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    // Axum's `nest` maps the inner "/" route to the bare prefix only, so the
    // trailing-slash collection path is registered explicitly as well.
    Router::new()
        .route("/clients/", get(list_clients).post(create_client))
        .nest(
            "/clients",
            Router::new()
                .route("/", get(list_clients).post(create_client))
                .route("/{id}", get(get_client).put(update_client))
                .route("/{id}/archive", post(archive_client))
                .route("/{id}/restore", post(restore_client)),
        )
}
