//! Self-service client portal: its own login over the same users table,
//! then a read-mostly view scoped to the session's linked client.

use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    account::User,
    billing::BillingDocument,
    client::{Client, UpdateClient},
    decor::DecorProject,
    studio::StudioBooking,
};
use services::services::auth::AuthService;
use utils::{jwt::SessionAudience, response::ApiResponse};
use uuid::Uuid;

use super::auth::{LoginRequest, LoginResponse};
use crate::{DeploymentImpl, error::ApiError, session::PortalSession};

fn linked_client_id(user: &User) -> Result<Uuid, ApiError> {
    user.client_id.ok_or(ApiError::NotFound)
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
        SessionAudience::Portal,
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(LoginResponse {
        token,
        user,
    })))
}

pub async fn me(
    State(deployment): State<DeploymentImpl>,
    PortalSession(user): PortalSession,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    let client_id = linked_client_id(&user)?;
    let client = Client::find_by_id(&deployment.db().pool, client_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(client)))
}

/// Profile update, limited to the session's own client record.
pub async fn update_me(
    State(deployment): State<DeploymentImpl>,
    PortalSession(user): PortalSession,
    axum::Json(payload): axum::Json<UpdateClient>,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    let pool = &deployment.db().pool;
    let client_id = linked_client_id(&user)?;
    if Client::find_by_id(pool, client_id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    let client = Client::update(pool, client_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(client)))
}

pub async fn my_documents(
    State(deployment): State<DeploymentImpl>,
    PortalSession(user): PortalSession,
) -> Result<ResponseJson<ApiResponse<Vec<BillingDocument>>>, ApiError> {
    let client_id = linked_client_id(&user)?;
    let documents = BillingDocument::find_by_client_id(&deployment.db().pool, client_id).await?;
    Ok(ResponseJson(ApiResponse::success(documents)))
}

pub async fn my_bookings(
    State(deployment): State<DeploymentImpl>,
    PortalSession(user): PortalSession,
) -> Result<ResponseJson<ApiResponse<Vec<StudioBooking>>>, ApiError> {
    let client_id = linked_client_id(&user)?;
    let bookings = StudioBooking::find_by_client_id(&deployment.db().pool, client_id).await?;
    Ok(ResponseJson(ApiResponse::success(bookings)))
}

pub async fn my_projects(
    State(deployment): State<DeploymentImpl>,
    PortalSession(user): PortalSession,
) -> Result<ResponseJson<ApiResponse<Vec<DecorProject>>>, ApiError> {
    let client_id = linked_client_id(&user)?;
    let projects = DecorProject::find_by_client_id(&deployment.db().pool, client_id).await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/portal",
        Router::new()
            .route("/login", post(login))
            .route("/me", get(me).put(update_me))
            .route("/documents", get(my_documents))
            .route("/bookings", get(my_bookings))
            .route("/projects", get(my_projects)),
    )
}
