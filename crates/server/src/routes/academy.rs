use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    academy::{Course, CreateCourse, CreateStudent, Student, UpdateStudent},
    account::Permission,
};
use services::services::{archive::ArchiveService, permissions::PermissionService};
use utils::response::ApiResponse;
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

pub async fn list_courses(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Course>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Academy).await?;
    let courses = Course::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(courses)))
}

pub async fn get_course(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Course>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Academy).await?;
    let course = Course::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(course)))
}

pub async fn create_course(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateCourse>,
) -> Result<ResponseJson<ApiResponse<Course>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Academy).await?;
    let course = Course::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(course)))
}

pub async fn update_course(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateCourse>,
) -> Result<ResponseJson<ApiResponse<Course>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Academy).await?;
    let course = Course::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(course)))
}

pub async fn archive_course(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Academy).await?;
    ArchiveService::archive_course(pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_course(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Academy).await?;
    if Course::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn course_students(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Student>>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Academy).await?;
    let students = Student::find_by_course_id(pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(students)))
}

pub async fn list_students(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Student>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Academy).await?;
    let students = Student::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(students)))
}

pub async fn get_student(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Student>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Academy).await?;
    let student = Student::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(student)))
}

pub async fn create_student(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateStudent>,
) -> Result<ResponseJson<ApiResponse<Student>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Academy).await?;
    if let Some(course_id) = payload.course_id {
        if Course::find_by_id(pool, course_id).await?.is_none() {
            return Err(ApiError::Validation("unknown course".to_string()));
        }
    }
    let student = Student::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(student)))
}

pub async fn update_student(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateStudent>,
) -> Result<ResponseJson<ApiResponse<Student>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Academy).await?;
    if let Some(course_id) = payload.course_id {
        if Course::find_by_id(pool, course_id).await?.is_none() {
            return Err(ApiError::Validation("unknown course".to_string()));
        }
    }
    let student = Student::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(student)))
}

pub async fn archive_student(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Academy).await?;
    if Student::set_archived(pool, id, true).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_student(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Academy).await?;
    if Student::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/academy",
        Router::new()
            .route("/courses", get(list_courses).post(create_course))
            .route("/courses/{id}", get(get_course).put(update_course))
            .route("/courses/{id}/archive", post(archive_course))
            .route("/courses/{id}/restore", post(restore_course))
            .route("/courses/{id}/students", get(course_students))
            .route("/students", get(list_students).post(create_student))
            .route("/students/{id}", get(get_student).put(update_student))
            .route("/students/{id}/archive", post(archive_student))
            .route("/students/{id}/restore", post(restore_student)),
    )
}
