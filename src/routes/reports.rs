use axum::{middleware, routing::get, Router};

use crate::handlers::report::{
    appointments_by_service, daily_appointments, dashboard, export_csv, general_stats,
    new_clients, top_clients,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/reports/stats", get(general_stats))
        .route("/admin/reports/services", get(appointments_by_service))
        .route("/admin/reports/daily", get(daily_appointments))
        .route("/admin/reports/new-clients", get(new_clients))
        .route("/admin/reports/top-clients", get(top_clients))
        .route("/admin/reports/dashboard", get(dashboard))
        .route("/admin/reports/export/csv", get(export_csv))
        .layer(middleware::from_fn_with_state(state, require_auth))
}
