//! Permission resolution: one role per user, flat tag set, admin bypass.

use db::models::account::{Permission, Role, User, UserKind};
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("permission denied: {0}")]
    Denied(Permission),
    #[error("portal accounts cannot access the dashboard")]
    PortalAccount,
}

pub struct PermissionService;

impl PermissionService {
    /// Check a single permission tag for a staff user. Synchronous beyond
    /// the role lookup; there is no hierarchy or delegation.
    pub async fn require(
        pool: &SqlitePool,
        user: &User,
        needed: Permission,
    ) -> Result<(), PermissionError> {
        if user.kind == UserKind::Portal {
            return Err(PermissionError::PortalAccount);
        }
        let role = match user.role_id {
            Some(role_id) => Role::find_by_id(pool, role_id).await?,
            None => None,
        };
        let Some(role) = role else {
            return Err(PermissionError::Denied(needed));
        };
        if Self::allows(&role, needed) {
            Ok(())
        } else {
            Err(PermissionError::Denied(needed))
        }
    }

    pub fn allows(role: &Role, needed: Permission) -> bool {
        role.is_admin() || role.permission_set().contains(&needed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use db::models::account::ADMIN_ROLE;
    use uuid::Uuid;

    use super::*;

    fn role(name: &str, permissions: &str) -> Role {
        Role {
            id: Uuid::now_v7(),
            name: name.to_string(),
            permissions: permissions.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn admin_role_bypasses_every_check() {
        let admin = role(ADMIN_ROLE, "[]");
        assert!(PermissionService::allows(&admin, Permission::Finance));
        assert!(PermissionService::allows(&admin, Permission::Accounts));
    }

    #[test]
    fn flat_tags_grant_exactly_what_they_name() {
        let cashier = role("cashier", r#"["shop", "finance"]"#);
        assert!(PermissionService::allows(&cashier, Permission::Shop));
        assert!(PermissionService::allows(&cashier, Permission::Finance));
        assert!(!PermissionService::allows(&cashier, Permission::Personnel));
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let odd = role("odd", r#"["shop", "time_travel"]"#);
        assert!(PermissionService::allows(&odd, Permission::Shop));
        assert!(!PermissionService::allows(&odd, Permission::Decor));
    }
}
