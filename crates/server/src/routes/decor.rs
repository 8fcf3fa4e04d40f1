use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    account::Permission,
    decor::{CreateDecorProject, DecorProject, UpdateDecorProject},
};
use services::services::permissions::PermissionService;
use utils::response::ApiResponse;
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

pub async fn list_projects(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<DecorProject>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Decor).await?;
    let projects = DecorProject::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn get_project(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<DecorProject>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Decor).await?;
    let project = DecorProject::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn create_project(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateDecorProject>,
) -> Result<ResponseJson<ApiResponse<DecorProject>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Decor).await?;
    let project = DecorProject::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn update_project(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateDecorProject>,
) -> Result<ResponseJson<ApiResponse<DecorProject>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Decor).await?;
    let project = DecorProject::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn archive_project(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Decor).await?;
    if DecorProject::set_archived(pool, id, true).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_project(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Decor).await?;
    if DecorProject::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/decor/projects",
        Router::new()
            .route("/", get(list_projects).post(create_project))
            .route("/{id}", get(get_project).put(update_project))
            .route("/{id}/archive", post(archive_project))
            .route("/{id}/restore", post(restore_project)),
    )
}
