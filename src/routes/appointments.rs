use axum::{middleware, routing::get, Router};

use crate::handlers::appointment::{
    create_appointment, delete_appointment, get_appointment, list_appointments,
    list_appointments_by_client, list_appointments_by_date, update_appointment,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route("/appointments/client/{client_id}", get(list_appointments_by_client))
        .route("/appointments/date/{date}", get(list_appointments_by_date))
        .route(
            "/appointments/{id}",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .layer(middleware::from_fn_with_state(state, require_auth))
}
