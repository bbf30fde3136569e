// Application state management
// Wraps the film registry together with runtime settings shared by handlers

use crate::state::registry::Registry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the application state
///
/// Every registry mutation runs under the write half of the lock, reads under
/// the read half, so concurrent requests never race on the collections.
pub type SharedState = Arc<RwLock<AppState>>;

/// Main application state
///
/// Owns the film/user registry and the bcrypt cost used when hashing new
/// account passwords.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Film and user registry
    pub registry: Registry,
    /// bcrypt cost factor for newly registered accounts
    pub bcrypt_cost: u32,
}

impl AppState {
    /// Create an empty state with the default bcrypt cost
    pub fn new() -> Self {
        Self::with_bcrypt_cost(bcrypt::DEFAULT_COST)
    }

    /// Create an empty state with an explicit bcrypt cost
    ///
    /// Tests use the minimum cost so hashing does not dominate the run time.
    pub fn with_bcrypt_cost(bcrypt_cost: u32) -> Self {
        Self {
            registry: Registry::new(),
            bcrypt_cost,
        }
    }

    /// Wrap a state in the shared handle handlers expect
    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
