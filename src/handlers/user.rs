use axum::extract::{Extension, State};
use axum::Json;
use sqlx::Error as SqlxError;
use tracing::{info, instrument, warn};

use crate::auth::jwt::sign_token;
use crate::auth::password::{hash_password, verify_password};
use crate::dtos::user::{
    LoginRequest, LoginResponse, RegisterUserRequest, UpdateProfileRequest, UserResponse,
};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::user::{Role, User};
use crate::state::AppState;

fn map_unique_violation(err: SqlxError, message: &str) -> AppError {
    match err {
        SqlxError::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict(message)
        }
        other => other.into(),
    }
}

// POST /register - Create a new account
#[instrument(skip(state, payload))]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(axum::http::StatusCode, Json<UserResponse>), AppError> {
    // Basic validation
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if !payload.email.contains('@') {
        return Err(AppError::validation("Invalid email"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation("Password too short"));
    }

    if User::username_or_email_taken(&state.db_pool, &payload.username, &payload.email).await? {
        warn!(username = %payload.username, "username or email already registered");
        return Err(AppError::conflict("Username or email already registered"));
    }

    let password_hash = hash_password(&payload.password)?;
    let role = payload.role.unwrap_or(Role::User);

    let user = User::create(
        &state.db_pool,
        &payload.username,
        &payload.email,
        &payload.full_name,
        &password_hash,
        role,
    )
    .await
    .map_err(|e| map_unique_violation(e, "Username or email already registered"))?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((axum::http::StatusCode::CREATED, Json(UserResponse::from(user))))
}

// POST /login - Verify credentials and issue a token
#[instrument(skip(state, payload))]
pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    // Unknown user and wrong password answer identically.
    let user = User::find_by_username(&state.db_pool, &payload.username)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(username = %payload.username, "login with invalid password");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let auth = &state.config.auth;
    let access_token = sign_token(&user.username, auth.token_ttl_minutes, &auth.secret)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        user_id: user.id,
        username: user.username,
    }))
}

// GET /auth/me - Current user profile
pub async fn get_me(
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserResponse>, AppError> {
    let user = auth.require_active()?;
    Ok(Json(UserResponse::from(user.clone())))
}

// PUT /auth/me - Self-service profile update
#[instrument(skip(state, auth, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = auth.require_active()?;

    if let Some(email) = payload.email.as_deref() {
        if !email.contains('@') {
            return Err(AppError::validation("Invalid email"));
        }
    }

    let password_hash = match payload.password.as_deref() {
        Some(plain) if plain.len() < 6 => {
            return Err(AppError::validation("Password too short"));
        }
        Some(plain) => Some(hash_password(plain)?),
        None => None,
    };

    let updated = User::update_profile(
        &state.db_pool,
        user.id,
        payload.full_name.as_deref(),
        payload.email.as_deref(),
        password_hash.as_deref(),
    )
    .await
    .map_err(|e| map_unique_violation(e, "Email already registered"))?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(updated)))
}
