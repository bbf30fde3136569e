//! HTTP Basic authentication
//!
//! Provides the [`AuthenticatedUser`] extractor that handlers take as an
//! argument to require a valid `Authorization: Basic` header. Credentials are
//! checked against the registry with `bcrypt::verify`; any failure (missing
//! header, malformed value, unknown user, wrong password) answers 401 with an
//! `{"ERROR": "Unauthorized access"}` body.

use crate::error::AppError;
use crate::state::SharedState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

/// The user whose credentials the request carried
///
/// Note this is the user named in the Authorization header, not the
/// `{username}` path segment; handlers resolve the path user separately.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Name of the authenticated user
    pub username: String,
}

/// Split a `Basic` authorization header value into username and password
fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_owned(), password.to_owned()))
}

#[async_trait]
impl FromRequestParts<SharedState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let (username, password) = decode_basic(header).ok_or(AppError::Unauthorized)?;

        let state = state.read().await;
        let user = state
            .registry
            .find_user(&username)
            .ok_or(AppError::Unauthorized)?;

        let verified = bcrypt::verify(&password, &user.password_hash).map_err(|err| {
            debug!(?err, "bcrypt verification failed");
            AppError::Unauthorized
        })?;
        if !verified {
            return Err(AppError::Unauthorized);
        }

        Ok(AuthenticatedUser { username })
    }
}

/// Hash a password with the configured cost
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost)
        .map_err(|err| AppError::Internal(anyhow::anyhow!("password hashing failed: {}", err)))
}

/// Build a `Basic` authorization header value for the given credentials
///
/// Used by tests; the inverse of `decode_basic`.
pub fn basic_header(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        BASE64.encode(format!("{}:{}", username, password))
    )
}
