use tracing::warn;

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
const DEV_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub frontend_origin: String,
    pub create_tables: bool,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from the environment. Everything has a
    /// development default so a bare `cargo run` works against a local
    /// SQLite file; the token secret falls back to a dev value with a
    /// loud warning.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using an insecure development secret");
            DEV_SECRET.to_string()
        });

        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://salon.db".to_string()),
            frontend_origin: std::env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            create_tables: std::env::var("CREATE_TABLES").as_deref() == Ok("1"),
            auth: AuthConfig {
                secret,
                token_ttl_minutes: std::env::var("TOKEN_TTL_MINUTES")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok())
                    .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
            },
        }
    }
}
