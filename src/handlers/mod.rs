pub mod auth;
pub mod companies;
pub mod jobs;
pub mod users;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Reject patch payload keys outside the entity's recognized vocabulary.
/// Identity fields are listed as recognized here and dropped later by the
/// update assembler, so supplying them never alters anything.
pub(crate) fn check_patch_fields(fields: &Map<String, Value>, allowed: &[&str]) -> Result<(), ApiError> {
    for key in fields.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(ApiError::bad_request(format!("Unrecognized field: {}", key)));
        }
    }
    Ok(())
}

pub(crate) fn to_value<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        ApiError::internal_server_error("Failed to format response")
    })
}
