use axum::extract::{Extension, Path, State};
use axum::Json;
use tracing::{info, instrument};

use crate::dtos::client::{ClientRequest, ClientResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::client::Client;
use crate::models::user::Role;
use crate::state::AppState;

fn validate(payload: &ClientRequest) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Name required"));
    }
    if !payload.email.contains('@') {
        return Err(AppError::validation("Invalid email"));
    }
    Ok(())
}

// POST /clients - Register a new salon client
#[instrument(skip(state, auth, payload))]
pub async fn create_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<ClientRequest>,
) -> Result<(axum::http::StatusCode, Json<ClientResponse>), AppError> {
    auth.require_active()?;
    validate(&payload)?;

    let client = Client::create(&state.db_pool, &payload.name, &payload.phone, &payload.email)
        .await?;

    info!(client_id = client.id, "client created");
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ClientResponse::from(client)),
    ))
}

// GET /clients - List all clients
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    auth.require_active()?;

    let clients = Client::list(&state.db_pool).await?;
    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

// GET /clients/{id} - Get a single client
pub async fn get_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<ClientResponse>, AppError> {
    auth.require_active()?;

    let client = Client::find_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Client not found"))?;

    Ok(Json(ClientResponse::from(client)))
}

// PUT /clients/{id} - Update a client
#[instrument(skip(state, auth, payload), fields(id))]
pub async fn update_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(payload): Json<ClientRequest>,
) -> Result<Json<ClientResponse>, AppError> {
    auth.require_active()?;
    validate(&payload)?;

    let client = Client::update(&state.db_pool, id, &payload.name, &payload.phone, &payload.email)
        .await?
        .ok_or_else(|| AppError::not_found("Client not found"))?;

    Ok(Json(ClientResponse::from(client)))
}

// DELETE /clients/{id} - Remove a client (admin only)
#[instrument(skip(state, auth), fields(id))]
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_role(&[Role::Admin])?;

    if Client::delete(&state.db_pool, id).await? == 0 {
        return Err(AppError::not_found("Client not found"));
    }

    info!(client_id = id, "client deleted");
    Ok(Json(serde_json::json!({ "message": "Client deleted" })))
}
