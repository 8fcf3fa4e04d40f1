//! Session tokens for the dashboard and the client portal.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token expired")]
    Expired,
    #[error("missing bearer token")]
    Missing,
}

/// Which surface the session belongs to. Portal sessions never reach
/// the dashboard routes and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAudience {
    Dashboard,
    Portal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub aud: SessionAudience,
    pub exp: i64,
}

pub fn mint_session(secret: &str, user_id: Uuid, audience: SessionAudience) -> Result<String, TokenError> {
    let claims = SessionClaims {
        sub: user_id,
        aud: audience,
        exp: (Utc::now() + Duration::hours(12)).timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn verify_session(secret: &str, token: &str) -> Result<SessionClaims, TokenError> {
    let mut validation = Validation::default();
    // Audience is our own enum, checked by the caller against the route tree.
    validation.validate_aud = false;
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    if data.claims.exp < Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_and_verify_round_trip() {
        let id = Uuid::now_v7();
        let token = mint_session("test-secret", id, SessionAudience::Dashboard).unwrap();
        let claims = verify_session("test-secret", &token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.aud, SessionAudience::Dashboard);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = mint_session("secret-a", Uuid::now_v7(), SessionAudience::Portal).unwrap();
        assert!(verify_session("secret-b", &token).is_err());
    }
}
