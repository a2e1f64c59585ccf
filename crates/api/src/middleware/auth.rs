//! # Authentication Module
//!
//! Admin-only endpoints (settings updates, booking lists and cancellations)
//! require an `Authorization: Bearer <admin key>` header. The key itself is
//! never stored: the server is configured with its Argon2 hash in PHC string
//! format and verifies the presented key against it.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use eyre::{Result, eyre};
use salonbook_core::errors::BookingError;

use crate::{ApiState, middleware::error_handling::AppError};

/// Hashes an admin key with Argon2 and a fresh random salt.
///
/// The result is a PHC string suitable for the `ADMIN_KEY_HASH` setting.
pub fn hash_admin_key(key: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(key.as_bytes(), &salt)
        .map_err(|e| eyre!("Error hashing admin key: {}", e))?
        .to_string();

    Ok(hash)
}

/// Checks a presented admin key against the configured PHC hash.
///
/// Returns an error only when the stored hash itself is malformed.
pub fn verify_admin_key(hash: &str, key: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| eyre!("Invalid admin key hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(key.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Extractor that only succeeds for requests carrying a valid admin key.
///
/// Add it as a handler argument to gate an endpoint:
///
/// ```ignore
/// async fn cancel_booking(_admin: AdminAccess, State(state): State<Arc<ApiState>>) { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let hash = state.admin_key_hash.as_deref().ok_or_else(|| {
            AppError(BookingError::Authorization(
                "Admin access is not configured".to_string(),
            ))
        })?;

        let key = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError(BookingError::Authentication(
                    "Missing admin bearer token".to_string(),
                ))
            })?;

        if verify_admin_key(hash, key).map_err(|e| BookingError::Internal(e.into()))? {
            Ok(AdminAccess)
        } else {
            tracing::warn!("Rejected request with invalid admin key");
            Err(AppError(BookingError::Authentication(
                "Invalid admin key".to_string(),
            )))
        }
    }
}
