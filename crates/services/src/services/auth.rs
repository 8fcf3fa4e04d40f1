//! Login and session issuance for the dashboard and the client portal.

use db::models::account::{User, UserKind};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use utils::jwt::{self, SessionAudience, TokenError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account is archived")]
    AccountArchived,
    #[error(transparent)]
    Token(#[from] TokenError),
}

pub fn hash_password(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn verify_password(raw: &str, hash: &str) -> bool {
    hash_password(raw) == hash
}

pub struct AuthService;

impl AuthService {
    /// Authenticate against the users table and mint a session token.
    /// Archived accounts are rejected with a dedicated error rather than a
    /// generic credentials failure, so the UI can explain the situation.
    pub async fn login(
        pool: &SqlitePool,
        secret: &str,
        email: &str,
        password: &str,
        audience: SessionAudience,
    ) -> Result<(User, String), AuthError> {
        let email = utils::contact::normalize_email(email);
        let user = User::find_by_email(pool, &email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if user.is_archived {
            return Err(AuthError::AccountArchived);
        }

        let expected_kind = match audience {
            SessionAudience::Dashboard => UserKind::Staff,
            SessionAudience::Portal => UserKind::Portal,
        };
        if user.kind != expected_kind {
            return Err(AuthError::InvalidCredentials);
        }

        let token = jwt::mint_session(secret, user.id, audience)?;
        info!(user_id = %user.id, kind = %user.kind, "session opened");
        Ok((user, token))
    }

    /// Resolve a bearer token back to its user. Sessions of archived
    /// accounts die immediately, whatever their expiry.
    pub async fn resolve_session(
        pool: &SqlitePool,
        secret: &str,
        token: &str,
        audience: SessionAudience,
    ) -> Result<User, AuthError> {
        let claims = jwt::verify_session(secret, token)?;
        if claims.aud != audience {
            return Err(AuthError::InvalidCredentials);
        }
        let user = User::find_by_id(pool, claims.sub)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if user.is_archived {
            return Err(AuthError::AccountArchived);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic_and_salted_inputs_differ() {
        assert_eq!(hash_password("hunter2"), hash_password("hunter2"));
        assert_ne!(hash_password("hunter2"), hash_password("hunter3"));
        assert!(verify_password("hunter2", &hash_password("hunter2")));
    }
}
