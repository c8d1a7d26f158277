pub mod admin;
pub mod appointments;
pub mod clients;
pub mod reports;
pub mod users;

use axum::Router;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(users::routes(state.clone()))
        .merge(clients::routes(state.clone()))
        .merge(appointments::routes(state.clone()))
        .merge(admin::routes(state.clone()))
        .merge(reports::routes(state))
}
