// State management module
// Handles application state and the film/user registry

pub mod app_state;
pub mod registry;

pub use app_state::{AppState, SharedState};
pub use registry::{Film, Registry, RegistryError, ReviewEntry, User};
