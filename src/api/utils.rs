//! API utility functions
//!
//! Field coercion helpers used by the JSON body handlers. The surface is
//! deliberately lenient about field types: numeric strings are accepted where
//! a number is expected and scalar values are accepted where a string is
//! expected, so request structs carry raw `serde_json::Value`s and handlers
//! coerce them here.

use crate::error::AppError;
use serde_json::Value;

/// Coerce a JSON value to a string
///
/// Strings are taken verbatim; any other value is rendered as its JSON text.
pub fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerce a JSON value to an integer
///
/// Accepts JSON numbers and numeric strings. Anything else yields the given
/// `InvalidNumericInput` message.
pub fn value_as_i64(value: &Value, message: &'static str) -> Result<i64, AppError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or(AppError::InvalidNumericInput(message)),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidNumericInput(message)),
        _ => Err(AppError::InvalidNumericInput(message)),
    }
}

/// Parse a path segment as a film year
pub fn parse_year(segment: &str) -> Result<i64, AppError> {
    segment
        .parse()
        .map_err(|_| AppError::InvalidNumericInput("Year of film must be a number, check it"))
}
