use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    account::Permission,
    finance::Transaction,
    personnel::{CreateEmployee, CreatePayrollRun, Employee, PayrollRun},
};
use services::services::{
    archive::ArchiveService, payroll::PayrollService, permissions::PermissionService,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use super::ListQuery;
use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

pub async fn list_employees(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Employee>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Personnel).await?;
    let employees = Employee::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(employees)))
}

pub async fn get_employee(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Employee>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Personnel).await?;
    let employee = Employee::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(employee)))
}

pub async fn create_employee(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreateEmployee>,
) -> Result<ResponseJson<ApiResponse<Employee>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Personnel).await?;
    let employee = Employee::create(pool, &payload, Uuid::now_v7()).await?;
    Ok(ResponseJson(ApiResponse::success(employee)))
}

pub async fn update_employee(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateEmployee>,
) -> Result<ResponseJson<ApiResponse<Employee>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Personnel).await?;
    let employee = Employee::update(pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(employee)))
}

pub async fn archive_employee(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Personnel).await?;
    ArchiveService::archive_employee(pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn restore_employee(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Personnel).await?;
    if Employee::set_archived(pool, id, false).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn employee_payroll(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<PayrollRun>>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Personnel).await?;
    let runs = PayrollRun::find_by_employee_id(pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(runs)))
}

pub async fn list_payroll(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<PayrollRun>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Personnel).await?;
    let runs = PayrollRun::find_all(&deployment.db().pool, query.include_archived).await?;
    Ok(ResponseJson(ApiResponse::success(runs)))
}

pub async fn get_payroll(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<PayrollRun>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Personnel).await?;
    let run = PayrollRun::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(run)))
}

pub async fn create_payroll(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    axum::Json(payload): axum::Json<CreatePayrollRun>,
) -> Result<ResponseJson<ApiResponse<PayrollRun>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Personnel).await?;
    if Employee::find_by_id(pool, payload.employee_id).await?.is_none() {
        return Err(ApiError::Validation("unknown employee".to_string()));
    }
    if payload.gross_cents < payload.deductions_cents {
        return Err(ApiError::Validation(
            "deductions exceed gross pay".to_string(),
        ));
    }
    let run = PayrollRun::create(pool, &payload, Uuid::now_v7())
        .await
        .map_err(|e| match e {
            // UNIQUE(employee_id, period)
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::Conflict("a payroll run already exists for this period".to_string())
            }
            other => ApiError::Database(other),
        })?;
    Ok(ResponseJson(ApiResponse::success(run)))
}

/// Flips the run to confirmed and books the matching expense entry; the
/// response carries the created transaction.
pub async fn confirm_payroll(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Transaction>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Personnel).await?;
    let transaction = PayrollService::confirm(pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(transaction)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/personnel",
        Router::new()
            .route("/employees", get(list_employees).post(create_employee))
            .route("/employees/{id}", get(get_employee).put(update_employee))
            .route("/employees/{id}/archive", post(archive_employee))
            .route("/employees/{id}/restore", post(restore_employee))
            .route("/employees/{id}/payroll", get(employee_payroll))
            .route("/payroll", get(list_payroll).post(create_payroll))
            .route("/payroll/{id}", get(get_payroll))
            .route("/payroll/{id}/confirm", post(confirm_payroll)),
    )
}
