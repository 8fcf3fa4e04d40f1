use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    archive::ArchiveError, auth::AuthError, billing::BillingError, payroll::PayrollError,
    permissions::PermissionError, sync::SyncError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Permission(#[from] PermissionError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Payroll(#[from] PayrollError),
    #[error(transparent)]
    Billing(#[from] BillingError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("record not found")]
    NotFound,
    #[error("administrator role required")]
    AdminOnly,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Database(sqlx::Error::RowNotFound) | Self::NotFound => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(AuthError::AccountArchived) => StatusCode::FORBIDDEN,
            Self::Auth(AuthError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Permission(PermissionError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Permission(_) => StatusCode::FORBIDDEN,
            Self::Archive(ArchiveError::NotFound) => StatusCode::NOT_FOUND,
            Self::Archive(ArchiveError::StillReferenced { .. }) => StatusCode::CONFLICT,
            Self::Archive(ArchiveError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Payroll(PayrollError::NotFound) => StatusCode::NOT_FOUND,
            Self::Payroll(PayrollError::AlreadyConfirmed) => StatusCode::CONFLICT,
            Self::Payroll(PayrollError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Billing(BillingError::NotFound) => StatusCode::NOT_FOUND,
            Self::Billing(BillingError::NotDraft | BillingError::NotIssued) => StatusCode::CONFLICT,
            Self::Billing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Sync(SyncError::Serialization(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Sync(SyncError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::AdminOnly => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(ApiResponse::<()>::error(self.to_string()));
        (status, body).into_response()
    }
}
