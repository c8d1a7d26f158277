use axum::{middleware, routing::get, Router};

use crate::handlers::admin::{
    delete_appointment, delete_client, delete_user, health, list_appointments, list_clients,
    list_users, stats, update_user,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}", axum::routing::put(update_user).delete(delete_user))
        .route("/admin/clients", get(list_clients))
        .route("/admin/clients/{id}", axum::routing::delete(delete_client))
        .route("/admin/appointments", get(list_appointments))
        .route("/admin/appointments/{id}", axum::routing::delete(delete_appointment))
        .route("/admin/stats", get(stats))
        .route("/admin/health", get(health))
        .layer(middleware::from_fn_with_state(state, require_auth))
}
