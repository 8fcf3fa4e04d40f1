use axum::{Router, extract::State, response::Json as ResponseJson, routing::{get, post}};
use db::models::account::User;
use serde::{Deserialize, Serialize};
use services::services::auth::AuthService;
use ts_rs::TS;
use utils::{jwt::SessionAudience, response::ApiResponse};

use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

#[derive(Debug, Deserialize, TS)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, TS)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

pub async fn login(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<LoginRequest>,
) -> Result<ResponseJson<ApiResponse<LoginResponse>>, ApiError> {
    let secret = deployment.jwt_secret().await;
    let (user, token) = AuthService::login(
        &deployment.db().pool,
        &secret,
        &payload.email,
        &payload.password,
        SessionAudience::Dashboard,
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(LoginResponse {
        token,
        user,
    })))
}

pub async fn me(
    StaffSession(user): StaffSession,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/auth",
        Router::new()
            .route("/login", post(login))
            .route("/me", get(me)),
    )
}
