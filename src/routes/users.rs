use axum::{middleware, routing::{get, post}, Router};

use crate::handlers::user::{get_me, login_user, register_user, update_me};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user));

    let protected = Router::new()
        .route("/auth/me", get(get_me).put(update_me))
        .layer(middleware::from_fn_with_state(state, require_auth));

    open.merge(protected)
}
