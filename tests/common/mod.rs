#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;

use salon_backend::auth::password::hash_password;
use salon_backend::config::{AppConfig, AuthConfig};
use salon_backend::database;
use salon_backend::middleware::auth::AuthContext;
use salon_backend::models::client::Client;
use salon_backend::models::user::{Role, User};
use salon_backend::state::AppState;

pub const TEST_PASSWORD: &str = "testpass123";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        frontend_origin: "http://localhost:5173".to_string(),
        create_tables: false,
        auth: AuthConfig {
            secret: "test-secret".to_string(),
            token_ttl_minutes: 30,
        },
    }
}

/// Fresh application state over an in-memory database. A single
/// connection keeps every query on the same in-memory instance.
pub async fn test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool should connect");
    database::init_schema(&pool)
        .await
        .expect("schema creation should succeed");
    AppState::new(pool, test_config())
}

pub async fn seed_user(state: &AppState, username: &str, role: Role) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    User::create(
        &state.db_pool,
        username,
        &format!("{username}@email.com"),
        "Test User",
        &password_hash,
        role,
    )
    .await
    .expect("user creation should succeed")
}

pub async fn seed_client(state: &AppState, name: &str, email: &str) -> Client {
    Client::create(&state.db_pool, name, "11999999999", email)
        .await
        .expect("client creation should succeed")
}

pub fn auth_as(user: User) -> AuthContext {
    AuthContext { user }
}
