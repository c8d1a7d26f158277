use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::{authenticate, authorize_active, authorize_role, AuthError};
use crate::error::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

/// The authenticated caller, attached as a request extension by
/// `require_auth`. Carries the full user row so role and active checks
/// always see current store state, not token claims.
#[derive(Clone)]
pub struct AuthContext {
    pub user: User,
}

impl AuthContext {
    pub fn require_active(&self) -> Result<&User, AuthError> {
        authorize_active(&self.user)
    }

    /// Active check first, then role membership, mirroring the
    /// token -> user -> active -> role layering.
    pub fn require_role(&self, allowed: &[Role]) -> Result<&User, AuthError> {
        authorize_role(authorize_active(&self.user)?, allowed)
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    // Expect "Bearer <token>"
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization format"))?;

    let user = authenticate(&state.db_pool, &state.config.auth, token).await?;

    req.extensions_mut().insert(AuthContext { user });

    Ok(next.run(req).await)
}
