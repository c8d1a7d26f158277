use axum::extract::{Extension, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use tracing::instrument;

use crate::dtos::report::{
    DailyCount, DashboardResponse, DaysQuery, ExportQuery, GeneralStats, LimitQuery,
    ServiceBreakdown, TopClientEntry,
};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::user::Role;
use crate::reports;
use crate::state::AppState;

// GET /admin/reports/stats
pub async fn general_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<GeneralStats>, AppError> {
    auth.require_role(&[Role::Admin])?;
    Ok(Json(reports::general_stats(&state.db_pool, Utc::now()).await?))
}

// GET /admin/reports/services?days=30
pub async fn appointments_by_service(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<DaysQuery>,
) -> Result<Json<Vec<ServiceBreakdown>>, AppError> {
    auth.require_role(&[Role::Admin])?;
    let days = query.days.unwrap_or(30);
    Ok(Json(
        reports::appointments_by_service(&state.db_pool, Utc::now(), days).await?,
    ))
}

// GET /admin/reports/daily?days=7
pub async fn daily_appointments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<DaysQuery>,
) -> Result<Json<Vec<DailyCount>>, AppError> {
    auth.require_role(&[Role::Admin])?;
    let days = query.days.unwrap_or(7);
    Ok(Json(
        reports::daily_appointments(&state.db_pool, Utc::now(), days).await?,
    ))
}

// GET /admin/reports/new-clients?days=30
pub async fn new_clients(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<DaysQuery>,
) -> Result<Json<Vec<DailyCount>>, AppError> {
    auth.require_role(&[Role::Admin])?;
    let days = query.days.unwrap_or(30);
    Ok(Json(
        reports::new_clients_by_day(&state.db_pool, Utc::now(), days).await?,
    ))
}

// GET /admin/reports/top-clients?limit=10
pub async fn top_clients(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<TopClientEntry>>, AppError> {
    auth.require_role(&[Role::Admin])?;
    let limit = query.limit.unwrap_or(10);
    Ok(Json(reports::top_clients(&state.db_pool, limit).await?))
}

// GET /admin/reports/dashboard - Everything the dashboard page needs
#[instrument(skip(state, auth))]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<DashboardResponse>, AppError> {
    auth.require_role(&[Role::Admin])?;

    let now = Utc::now();
    Ok(Json(DashboardResponse {
        general_stats: reports::general_stats(&state.db_pool, now).await?,
        appointments_by_service: reports::appointments_by_service(&state.db_pool, now, 30)
            .await?,
        daily_appointments: reports::daily_appointments(&state.db_pool, now, 7).await?,
        new_clients: reports::new_clients_by_day(&state.db_pool, now, 30).await?,
        top_clients: reports::top_clients(&state.db_pool, 5).await?,
    }))
}

// GET /admin/reports/export/csv?kind=clients|appointments|services
#[instrument(skip(state, auth))]
pub async fn export_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    auth.require_role(&[Role::Admin])?;

    let (filename, body) = reports::export_csv(
        &state.db_pool,
        &query.kind,
        query.start.as_deref(),
        query.end.as_deref(),
        Utc::now(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        body,
    )
        .into_response())
}
