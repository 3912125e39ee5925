//! Shared REST response decoding
//!
//! Every client funnels responses through [`decode_response`]: the body is
//! parsed once, recognized error shapes raise [`ApiError::Remote`], and only
//! then is the payload deserialized into the caller's type.

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::ApiError;

/// Read a response body, classify known error shapes, and deserialize.
///
/// Recognized error shapes (checked in order):
/// - `{"message": ..., "status": ..., "code": ...}`
/// - `{"error": {"status": ..., "message": ..., "code": ..., "details": ...}}`
///
/// An empty body decodes as an empty JSON object.
///
/// # Errors
/// - [`ApiError::Network`] when the body cannot be read
/// - [`ApiError::Remote`] when an error shape is recognized
/// - [`ApiError::Decode`] when the payload does not match `T`
pub async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    decode_body(&body)
}

pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let trimmed = body.trim();
    let value: Value = if trimmed.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(trimmed).map_err(|e| ApiError::Decode(e.to_string()))?
    };

    if let Some(message) = value.get("message").filter(|m| !m.is_null()) {
        return Err(ApiError::Remote {
            status: str_field(&value, "status"),
            message: message.as_str().map_or_else(|| message.to_string(), ToString::to_string),
            code: value.get("code").and_then(Value::as_i64).unwrap_or_default(),
            details: None,
        });
    }

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        return Err(ApiError::Remote {
            status: str_field(error, "status"),
            message: str_field(error, "message"),
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            details: error.get("details").filter(|d| !d.is_null()).cloned(),
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn str_field(value: &Value, name: &str) -> String {
    value.get(name).and_then(Value::as_str).unwrap_or_default().to_string()
}
