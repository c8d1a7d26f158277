//! One-shot setup: create the schema and seed a default admin account.
//! Run with `cargo run --bin init_db`.

use dotenvy::dotenv;

use salon_backend::auth::password::hash_password;
use salon_backend::config::AppConfig;
use salon_backend::database;
use salon_backend::models::user::{Role, User};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenv().ok();

    let config = AppConfig::from_env();
    println!("Initializing database: {}", config.database_url);

    let pool = database::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    database::init_schema(&pool)
        .await
        .expect("Failed to create tables");
    println!("Tables created.");

    let existing = User::find_by_username(&pool, "admin")
        .await
        .expect("Failed to look up admin user");

    if existing.is_some() {
        println!("Admin user already exists, nothing to do.");
        return;
    }

    let password =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let password_hash = hash_password(&password).expect("Failed to hash admin password");

    User::create(
        &pool,
        "admin",
        "admin@salao.com",
        "Administrator",
        &password_hash,
        Role::Admin,
    )
    .await
    .expect("Failed to create admin user");

    println!("Admin user created (username: admin).");
    if password == "admin123" {
        println!("Using the default password - change it before going to production!");
    }
}
