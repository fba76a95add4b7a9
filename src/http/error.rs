//! Error classification for backend responses.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Failures talking to the backend that callers may want to tell apart.
#[derive(Debug)]
pub enum ApiError {
    /// Authentication failed (HTTP 401)
    Unauthorized(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Other 4xx responses
    ClientError(String),
    /// 5xx responses
    ServerError(String),
    /// The body was not the JSON document we expected
    InvalidPayload(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => {
                write!(f, "Authentication failed: {}. Check MMPM_TOKEN.", msg)
            }
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ClientError(msg) => write!(f, "Request error: {}", msg),
            ApiError::ServerError(msg) => write!(f, "Server error: {}", msg),
            ApiError::InvalidPayload(msg) => write!(f, "Invalid response payload: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Map an error returned by `error_for_status()` onto [`ApiError`].
/// Errors without a status (connection refused, broken body) pass through.
pub fn classify_error(error: reqwest::Error) -> anyhow::Error {
    let Some(status) = error.status() else {
        return anyhow::Error::from(error);
    };

    let url = error
        .url()
        .map(|u| u.path().to_string())
        .unwrap_or_default();

    let classified = match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(url),
        StatusCode::NOT_FOUND => ApiError::NotFound(url),
        s if s.is_client_error() => ApiError::ClientError(format!("HTTP {} from {}", s.as_u16(), url)),
        s => ApiError::ServerError(format!("HTTP {} from {}", s.as_u16(), url)),
    };

    anyhow::Error::from(classified)
}

/// Decode a response body into `T`.
///
/// Several endpoints answer with a JSON string whose content is itself a
/// JSON document; such strings are unwrapped before decoding.
pub fn decode_payload<T: DeserializeOwned>(value: Value) -> anyhow::Result<T> {
    let value = match value {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(inner) => inner,
            Err(_) => Value::String(text),
        },
        other => other,
    };

    serde_json::from_value(value)
        .map_err(|e| anyhow::Error::from(ApiError::InvalidPayload(e.to_string())))
}
