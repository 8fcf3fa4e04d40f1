use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{account::Permission, settings::SettingsDoc};
use services::services::permissions::PermissionService;
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

pub async fn list_settings(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
) -> Result<ResponseJson<ApiResponse<Vec<SettingsDoc>>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Settings).await?;
    let docs = SettingsDoc::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(docs)))
}

pub async fn get_settings_doc(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<SettingsDoc>>, ApiError> {
    PermissionService::require(&deployment.db().pool, &user, Permission::Settings).await?;
    let doc = SettingsDoc::find_by_id(&deployment.db().pool, &id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(doc)))
}

/// Full-document replacement. The payload is stored as opaque JSON; typed
/// views (company profile, billing counters, wifi-zone settings) are parsed
/// out where they are consumed.
pub async fn put_settings_doc(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(id): Path<String>,
    axum::Json(payload): axum::Json<serde_json::Value>,
) -> Result<ResponseJson<ApiResponse<SettingsDoc>>, ApiError> {
    let pool = &deployment.db().pool;
    PermissionService::require(pool, &user, Permission::Settings).await?;
    if !payload.is_object() {
        return Err(ApiError::Validation(
            "settings payload must be a JSON object".to_string(),
        ));
    }
    let doc = SettingsDoc::put(pool, &id, &payload.to_string()).await?;
    Ok(ResponseJson(ApiResponse::success(doc)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/settings",
        Router::new()
            .route("/", get(list_settings))
            .route("/{id}", get(get_settings_doc).put(put_settings_doc)),
    )
}
