pub mod jwt;
pub mod password;

use sqlx::SqlitePool;

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::models::user::{Role, User};

/// Identity failures. Each maps to exactly one HTTP status in
/// `error.rs`; none of them is retryable without new input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("inactive account")]
    InactiveAccount,
    #[error("insufficient permission")]
    InsufficientPermission,
}

/// Resolve a bearer token to its user record. The token only carries the
/// username; role and active flag are always read fresh from the store.
pub async fn authenticate(
    pool: &SqlitePool,
    auth: &AuthConfig,
    token: &str,
) -> Result<User, AppError> {
    let username = jwt::resolve_token(token, &auth.secret)?;

    let user = User::find_by_username(pool, &username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    Ok(user)
}

pub fn authorize_active(user: &User) -> Result<&User, AuthError> {
    if !user.is_active {
        return Err(AuthError::InactiveAccount);
    }
    Ok(user)
}

pub fn authorize_role<'a>(user: &'a User, allowed: &[Role]) -> Result<&'a User, AuthError> {
    if !allowed.contains(&user.role) {
        return Err(AuthError::InsufficientPermission);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(role: Role, is_active: bool) -> User {
        User {
            id: 1,
            username: "ana".into(),
            email: "ana@example.com".into(),
            full_name: "Ana Souza".into(),
            password_hash: "irrelevant".into(),
            role,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn active_user_passes_active_check() {
        let user = sample_user(Role::User, true);
        assert!(authorize_active(&user).is_ok());
    }

    #[test]
    fn inactive_user_is_rejected_regardless_of_role() {
        let admin = sample_user(Role::Admin, false);
        assert!(matches!(
            authorize_active(&admin),
            Err(AuthError::InactiveAccount)
        ));
    }

    #[test]
    fn role_must_be_in_allowed_set() {
        let user = sample_user(Role::User, true);
        assert!(matches!(
            authorize_role(&user, &[Role::Admin]),
            Err(AuthError::InsufficientPermission)
        ));

        let staff = sample_user(Role::Staff, true);
        assert!(authorize_role(&staff, &[Role::Staff, Role::Admin]).is_ok());

        let admin = sample_user(Role::Admin, true);
        assert!(authorize_role(&admin, &[Role::Admin]).is_ok());
    }
}
