use axum::{middleware, routing::get, Router};

use crate::handlers::client::{
    create_client, delete_client, get_client, list_clients, update_client,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .layer(middleware::from_fn_with_state(state, require_auth))
}
