//! Film Registry Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
/// Application state management
///
/// Holds the in-memory film and user registry shared across requests.
pub mod state;
