use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

pub fn sign_token(username: &str, ttl_minutes: i64, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = now + Duration::minutes(ttl_minutes);
    let claims = Claims {
        sub: username.to_string(),
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Token signing failed: {e}")))
}

/// Verify signature and expiry and return the subject. Every failure mode
/// (bad signature, expired, missing subject, not a JWT at all) collapses
/// into `InvalidCredentials` so callers cannot probe for the difference.
pub fn resolve_token(token: &str, secret: &str) -> Result<String, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims.sub)
    .map_err(|_| AuthError::InvalidCredentials)
}
