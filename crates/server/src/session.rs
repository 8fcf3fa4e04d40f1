//! Bearer-token extractors for the two session audiences.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use db::models::account::User;
use services::services::auth::{AuthError, AuthService};
use utils::jwt::{SessionAudience, TokenError};

use crate::{DeploymentImpl, error::ApiError};

/// An authenticated dashboard (staff) user.
pub struct StaffSession(pub User);

/// An authenticated client-portal user.
pub struct PortalSession(pub User);

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Auth(AuthError::Token(TokenError::Missing)))
}

impl FromRequestParts<DeploymentImpl> for StaffSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DeploymentImpl,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_string();
        let secret = state.jwt_secret().await;
        let user = AuthService::resolve_session(
            &state.db().pool,
            &secret,
            &token,
            SessionAudience::Dashboard,
        )
        .await?;
        Ok(Self(user))
    }
}

impl FromRequestParts<DeploymentImpl> for PortalSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DeploymentImpl,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_string();
        let secret = state.jwt_secret().await;
        let user = AuthService::resolve_session(
            &state.db().pool,
            &secret,
            &token,
            SessionAudience::Portal,
        )
        .await?;
        Ok(Self(user))
    }
}
