use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    account::Permission,
    studio::{CreateStudioBooking, StudioBooking, UpdateStudioBooking},
};
use services::services::permissions::PermissionService;
use utils::response::ApiResponse;
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

pub async fn list_bookings(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<StudioBooking>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Studio).await?;
    let bookings = StudioBooking::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(bookings)))
}

pub async fn get_booking(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<StudioBooking>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Studio).await?;
    let booking = StudioBooking::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(booking)))
}

pub async fn create_booking(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateStudioBooking>,
) -> Result<ResponseJson<ApiResponse<StudioBooking>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Studio).await?;
    if payload.duration_minutes <= 0 {
        return Err(ApiError::Validation(
            "booking duration must be positive".to_string(),
        ));
    }
    let booking = StudioBooking::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(booking)))
}

pub async fn update_booking(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateStudioBooking>,
) -> Result<ResponseJson<ApiResponse<StudioBooking>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Studio).await?;
    if payload.duration_minutes <= 0 {
        return Err(ApiError::Validation(
            "booking duration must be positive".to_string(),
        ));
    }
    let booking = StudioBooking::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(booking)))
}

pub async fn archive_booking(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Studio).await?;
    if StudioBooking::set_archived(pool, id, true).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_booking(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Studio).await?;
    if StudioBooking::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/studio/bookings",
        Router::new()
            .route("/", get(list_bookings).post(create_booking))
            .route("/{id}", get(get_booking).put(update_booking))
            .route("/{id}/archive", post(archive_booking))
            .route("/{id}/restore", post(restore_booking)),
    )
}
