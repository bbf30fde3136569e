//! Account registration API handler
//!
//! Account creation is the one endpoint that does not require authentication;
//! it is how credentials come into existence. Passwords are bcrypt-hashed
//! before they reach the registry, the plaintext is never stored.

use crate::api::utils::value_as_string;
use crate::auth::hash_password;
use crate::error::AppError;
use crate::state::SharedState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Create account request
///
/// Fields are optional so that a missing field maps to the surface's 400
/// message instead of a deserialization rejection.
#[derive(Deserialize, Default)]
pub struct CreateAccountRequest {
    /// Desired username
    #[serde(default)]
    pub username: Option<Value>,
    /// Password, any JSON scalar accepted
    #[serde(default)]
    pub password: Option<Value>,
}

/// Create account response
#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    /// Performed action, echoing the registered username
    #[serde(rename = "ACTION")]
    pub action: AccountAction,
}

/// Echo of the registered account
#[derive(Debug, Serialize)]
pub struct AccountAction {
    /// Name the account was registered under
    pub username: String,
}

/// POST /create_account - Register a new user
pub async fn create_account(
    State(state): State<SharedState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<CreateAccountResponse>, AppError> {
    let (Some(username), Some(password)) = (&request.username, &request.password) else {
        return Err(AppError::MissingFields(
            "Invalid data, please give username and password",
        ));
    };
    let username = value_as_string(username);
    let password = value_as_string(password);

    // Check for a taken name before paying for the hash
    let cost = {
        let state = state.read().await;
        if state.registry.find_user(&username).is_some() {
            return Err(AppError::UserAlreadyExists);
        }
        state.bcrypt_cost
    };

    let hash = hash_password(&password, cost)?;

    let mut state = state.write().await;
    state.registry.add_user(&username, hash)?;
    info!(username = %username, "account created");

    Ok(Json(CreateAccountResponse {
        action: AccountAction { username },
    }))
}
