//! API key authentication extractor.
//!
//! Extracts and verifies API keys from:
//! - `Authorization: Bearer <key>` header
//! - `X-API-Key: <key>` header
//!
//! Keys are SHA-256 hashed and compared against `users.api_key_hash`; the
//! matched user is assembled with capabilities and taught-course ids so the
//! authorization gate can decide without further queries.

use std::collections::HashSet;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use sqlx::Row;

use skillsheet_types::ids::{CourseId, UserId};
use skillsheet_types::user::{User, UserRole};

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated user. Extracting this validates the API key.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = extract_api_key(parts)?;
        let key_hash = hash_api_key(&api_key);

        let row = sqlx::query("SELECT id, name, role FROM users WHERE api_key_hash = ?")
            .bind(&key_hash)
            .fetch_optional(&state.db_pool.reader)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;

        let Some(row) = row else {
            return Err(AppError::Unauthorized(
                "Invalid API key. Provide a valid key via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
            ));
        };

        let id: i64 = row
            .try_get("id")
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;
        let name: String = row
            .try_get("name")
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;
        let role: String = row
            .try_get("role")
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;
        let role: UserRole = role
            .parse()
            .map_err(|e: String| AppError::Internal(e))?;

        let capability_rows =
            sqlx::query("SELECT capability FROM user_capabilities WHERE user_id = ?")
                .bind(id)
                .fetch_all(&state.db_pool.reader)
                .await
                .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;
        let mut capabilities = HashSet::new();
        for row in &capability_rows {
            let capability: String = row
                .try_get("capability")
                .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;
            capabilities.insert(capability);
        }

        let course_rows = sqlx::query("SELECT course_id FROM course_teachers WHERE user_id = ?")
            .bind(id)
            .fetch_all(&state.db_pool.reader)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;
        let mut course_ids = HashSet::new();
        for row in &course_rows {
            let course_id: i64 = row
                .try_get("course_id")
                .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;
            course_ids.insert(CourseId(course_id));
        }

        Ok(CurrentUser(User {
            id: UserId(id),
            name,
            role,
            capabilities,
            course_ids,
        }))
    }
}

/// Extract the API key from request headers.
fn extract_api_key(parts: &Parts) -> Result<String, AppError> {
    // Try Authorization: Bearer <key>
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(key) = auth_str.strip_prefix("Bearer ") {
            return Ok(key.trim().to_string());
        }
    }

    // Try X-API-Key header
    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(key_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing API key. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
    ))
}

/// Compute SHA-256 hash of an API key (lowercase hex).
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)
}

/// Ensure an admin user with an API key exists.
///
/// On the first `serve`, creates the `admin` user with a fresh key and
/// returns the plaintext (shown to the operator once). Further users and
/// their course assignments are managed by external administration.
pub async fn ensure_admin_user(state: &AppState) -> anyhow::Result<String> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users LIMIT 1")
        .fetch_optional(&state.db_pool.reader)
        .await?;

    if existing.is_some() {
        return Ok("(existing key - shown only on first creation)".to_string());
    }

    use rand::RngCore;
    let mut key_bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut key_bytes);
    let plaintext_key = format!(
        "sksh_{}",
        key_bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>()
    );

    let key_hash = hash_api_key(&plaintext_key);
    sqlx::query("INSERT INTO users (name, role, api_key_hash) VALUES ('admin', 'admin', ?)")
        .bind(&key_hash)
        .execute(&state.db_pool.writer)
        .await?;

    Ok(plaintext_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(name: &str, value: &str) -> Parts {
        let request = Request::builder()
            .header(name, value)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    #[test]
    fn extracts_bearer_key() {
        let parts = parts_with_header("authorization", "Bearer sksh_abc");
        assert_eq!(extract_api_key(&parts).unwrap(), "sksh_abc");
    }

    #[test]
    fn extracts_x_api_key_header() {
        let parts = parts_with_header("x-api-key", " sksh_def ");
        assert_eq!(extract_api_key(&parts).unwrap(), "sksh_def");
    }

    #[test]
    fn missing_key_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        let (parts, _) = request.into_parts();
        assert!(matches!(
            extract_api_key(&parts),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn hash_is_stable_lowercase_hex() {
        let hash = hash_api_key("sksh_abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_api_key("sksh_abc"));
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
