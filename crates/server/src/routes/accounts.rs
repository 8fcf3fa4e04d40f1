use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::{
    account::{CreateRole, CreateUser, Permission, Role, User, UserKind},
    client::Client,
};
use serde::Deserialize;
use services::services::{auth, permissions::PermissionService};
use utils::{contact, response::ApiResponse};
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub kind: UserKind,
    pub role_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
}

pub async fn list_roles(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
) -> Result<ResponseJson<ApiResponse<Vec<Role>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Accounts).await?;
    let roles = Role::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(roles)))
}

pub async fn get_role(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Role>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Accounts).await?;
    let role = Role::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(role)))
}

pub async fn create_role(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateRole>,
) -> Result<ResponseJson<ApiResponse<Role>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Accounts).await?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("role name is required".to_string()));
    }
    if Role::find_by_name(pool, &payload.name).await?.is_some() {
        return Err(ApiError::Conflict("role name already taken".to_string()));
    }
    let role = Role::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(role)))
}

pub async fn update_role(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateRole>,
) -> Result<ResponseJson<ApiResponse<Role>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Accounts).await?;
    if let Some(existing) = Role::find_by_name(pool, &payload.name).await? {
        if existing.id != id {
            return Err(ApiError::Conflict("role name already taken".to_string()));
        }
    }
    let role = Role::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(role)))
}

/// Roles are hard-deleted, but never while a user still references one.
pub async fn delete_role(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Accounts).await?;
    let users = Role::count_users(pool, id).await?;
    if users > 0 {
        return Err(ApiError::Conflict(format!(
            "role is still assigned to {users} user(s)"
        )));
    }
    if Role::delete(pool, id).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_users(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<User>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Accounts).await?;
    let users = User::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(users)))
}

pub async fn get_user(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Accounts).await?;
    let found = User::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(found)))
}

pub async fn create_user(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateUserRequest>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Accounts).await?;

    let email = contact::normalize_email(&payload.email);
    if email.is_empty() {
        return Err(ApiError::Validation("email is required".to_string()));
    }
    if User::find_by_email(pool, &email).await?.is_some() {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }
    match payload.kind {
        UserKind::Portal => {
            let Some(client_id) = payload.client_id else {
                return Err(ApiError::Validation(
                    "portal accounts must reference a client".to_string(),
                ));
            };
            if Client::find_by_id(pool, client_id).await?.is_none() {
                return Err(ApiError::Validation("unknown client".to_string()));
            }
        }
        UserKind::Staff => {
            if let Some(role_id) = payload.role_id {
                if Role::find_by_id(pool, role_id).await?.is_none() {
                    return Err(ApiError::Validation("unknown role".to_string()));
                }
            }
        }
    }

    let created = User::create(
        pool,
        &CreateUser {
            email,
            password_hash: auth::hash_password(&payload.password),
            kind: payload.kind,
            role_id: payload.role_id,
            client_id: payload.client_id,
        },
        Uuid::now_v7(),
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(created)))
}

pub async fn set_user_role(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<SetRoleRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Accounts).await?;
    if let Some(role_id) = payload.role_id {
        if Role::find_by_id(pool, role_id).await?.is_none() {
            return Err(ApiError::Validation("unknown role".to_string()));
        }
    }
    if User::update_role(pool, id, payload.role_id).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn set_user_password(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<SetPasswordRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Accounts).await?;
    if payload.password.is_empty() {
        return Err(ApiError::Validation("password is required".to_string()));
    }
    let hash = auth::hash_password(&payload.password);
    if User::update_password_hash(pool, id, &hash).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn archive_user(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Accounts).await?;
    if id == user.id {
        return Err(ApiError::Conflict(
            "cannot archive your own account".to_string(),
        ));
    }
    if User::set_archived(pool, id, true).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_user(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Accounts).await?;
    if User::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/accounts",
        Router::new()
            .route("/roles", get(list_roles).post(create_role))
            .route(
                "/roles/{id}",
                get(get_role).put(update_role).delete(delete_role),
            )
            .route("/users", get(list_users).post(create_user))
            .route("/users/{id}", get(get_user))
            .route("/users/{id}/role", put(set_user_role))
            .route("/users/{id}/password", put(set_user_password))
            .route("/users/{id}/archive", post(archive_user))
            .route("/users/{id}/restore", post(restore_user)),
    )
}
