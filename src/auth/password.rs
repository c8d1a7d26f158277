use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

pub fn hash_password(plain: &str) -> Result<String, AppError> {
    hash(plain, DEFAULT_COST).map_err(|e| AppError::internal(format!("Hash error: {e}")))
}

/// Check a plaintext password against a stored bcrypt hash. Fails closed:
/// a malformed hash counts as a failed match instead of an error, so a
/// corrupted row can never let a login through.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    verify(plain, hashed).unwrap_or(false)
}
