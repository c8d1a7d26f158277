use axum::extract::{Extension, Path, State};
use axum::Json;
use tracing::{info, instrument};

use crate::dtos::client::ClientResponse;
use crate::dtos::appointment::AppointmentResponse;
use crate::dtos::report::SystemStats;
use crate::dtos::user::{UpdateAccountRequest, UserResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::appointment::Appointment;
use crate::models::client::Client;
use crate::models::user::{Role, User};
use crate::state::AppState;

// ==================== Users ====================

// GET /admin/users - List all accounts
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    auth.require_role(&[Role::Admin])?;

    let users = User::list(&state.db_pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// PUT /admin/users/{id} - Change role or active flag
#[instrument(skip(state, auth, payload), fields(id))]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth.require_role(&[Role::Admin])?;

    let user = User::update_account(&state.db_pool, id, payload.role, payload.is_active)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    info!(user_id = id, role = user.role.as_str(), is_active = user.is_active, "account updated");
    Ok(Json(UserResponse::from(user)))
}

// DELETE /admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Admin])?;

    if User::delete(&state.db_pool, id).await? == 0 {
        return Err(AppError::not_found("User not found"));
    }

    info!(user_id = id, "user deleted");
    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}

// ==================== Clients & appointments ====================

// GET /admin/clients
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    auth.require_role(&[Role::Admin])?;

    let clients = Client::list(&state.db_pool).await?;
    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

// DELETE /admin/clients/{id}
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Admin])?;

    if Client::delete(&state.db_pool, id).await? == 0 {
        return Err(AppError::not_found("Client not found"));
    }

    Ok(Json(serde_json::json!({ "message": "Client deleted" })))
}

// GET /admin/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    auth.require_role(&[Role::Admin])?;

    let appointments = Appointment::list(&state.db_pool).await?;
    Ok(Json(
        appointments.into_iter().map(AppointmentResponse::from).collect(),
    ))
}

// DELETE /admin/appointments/{id}
pub async fn delete_appointment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Admin])?;

    if Appointment::delete(&state.db_pool, id).await? == 0 {
        return Err(AppError::not_found("Appointment not found"));
    }

    Ok(Json(serde_json::json!({ "message": "Appointment deleted" })))
}

// ==================== System ====================

// GET /admin/stats - Entity totals
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<SystemStats>, AppError> {
    auth.require_role(&[Role::Admin])?;

    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM users")
        .fetch_one(&state.db_pool)
        .await?;
    let total_clients: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM clients")
        .fetch_one(&state.db_pool)
        .await?;
    let total_appointments: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM appointments")
        .fetch_one(&state.db_pool)
        .await?;

    Ok(Json(SystemStats {
        total_users,
        total_clients,
        total_appointments,
    }))
}

// GET /admin/health
pub async fn health(
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Admin])?;
    Ok(Json(serde_json::json!({ "status": "OK" })))
}
