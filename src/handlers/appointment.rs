use axum::extract::{Extension, Path, State};
use axum::Json;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::Error as SqlxError;
use tracing::{info, instrument};

use crate::booking::admit;
use crate::dtos::appointment::{AppointmentRequest, AppointmentResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::appointment::Appointment;
use crate::models::client::Client;
use crate::state::AppState;

/// The admission check and the write are two steps; if a concurrent
/// request books the slot in between, the UNIQUE constraint fires and we
/// report it as the same conflict the check would have caught.
fn map_slot_conflict(err: SqlxError) -> AppError {
    match err {
        SqlxError::Database(db_err) if db_err.is_unique_violation() => {
            AppError::validation("An appointment already exists for this time slot")
        }
        other => other.into(),
    }
}

// POST /appointments - Book an appointment
#[instrument(skip(state, auth, payload))]
pub async fn create_appointment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<AppointmentRequest>,
) -> Result<(axum::http::StatusCode, Json<AppointmentResponse>), AppError> {
    auth.require_active()?;

    let admitted = admit(&state.db_pool, payload.into(), Utc::now(), None).await?;

    let appointment = Appointment::create(&state.db_pool, &admitted)
        .await
        .map_err(map_slot_conflict)?;

    info!(
        appointment_id = appointment.id,
        client_id = appointment.client_id,
        "appointment booked"
    );
    Ok((
        axum::http::StatusCode::CREATED,
        Json(AppointmentResponse::from(appointment)),
    ))
}

// GET /appointments - List all appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    auth.require_active()?;

    let appointments = Appointment::list(&state.db_pool).await?;
    Ok(Json(
        appointments.into_iter().map(AppointmentResponse::from).collect(),
    ))
}

// GET /appointments/{id} - Get a single appointment
pub async fn get_appointment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<AppointmentResponse>, AppError> {
    auth.require_active()?;

    let appointment = Appointment::find_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Appointment not found"))?;

    Ok(Json(AppointmentResponse::from(appointment)))
}

// PUT /appointments/{id} - Reschedule or edit an appointment
#[instrument(skip(state, auth, payload), fields(id))]
pub async fn update_appointment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<AppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    auth.require_active()?;

    if Appointment::find_by_id(&state.db_pool, id).await?.is_none() {
        return Err(AppError::not_found("Appointment not found"));
    }

    // The appointment being updated is excluded from the conflict scan
    // so keeping its own slot is not a conflict.
    let admitted = admit(&state.db_pool, payload.into(), Utc::now(), Some(id)).await?;

    let appointment = Appointment::update(&state.db_pool, id, &admitted)
        .await
        .map_err(map_slot_conflict)?
        .ok_or_else(|| AppError::not_found("Appointment not found"))?;

    Ok(Json(AppointmentResponse::from(appointment)))
}

// DELETE /appointments/{id} - Cancel an appointment
#[instrument(skip(state, auth), fields(id))]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_active()?;

    if Appointment::delete(&state.db_pool, id).await? == 0 {
        return Err(AppError::not_found("Appointment not found"));
    }

    info!(appointment_id = id, "appointment deleted");
    Ok(Json(serde_json::json!({ "message": "Appointment deleted" })))
}

// GET /appointments/client/{client_id} - All appointments for one client
pub async fn list_appointments_by_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    auth.require_active()?;

    if Client::find_by_id(&state.db_pool, client_id).await?.is_none() {
        return Err(AppError::not_found("Client not found"));
    }

    let appointments = Appointment::list_by_client(&state.db_pool, client_id).await?;
    Ok(Json(
        appointments.into_iter().map(AppointmentResponse::from).collect(),
    ))
}

// GET /appointments/date/{date} - All appointments on a calendar day
pub async fn list_appointments_by_date(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    auth.require_active()?;

    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let end = start + Duration::days(1);

    let appointments = Appointment::list_between(&state.db_pool, start, end).await?;
    Ok(Json(
        appointments.into_iter().map(AppointmentResponse::from).collect(),
    ))
}
