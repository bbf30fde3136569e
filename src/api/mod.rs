//! API module
//!
//! Contains HTTP request handlers for the film registry endpoints

pub mod accounts;
pub mod films;
pub mod queries;
pub mod utils;
