use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// `{success, data?, error?, message?}` wrapper around every response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap `data`, treating its absence as a malformed response
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::InvalidResponse("response envelope has no data".to_string()))
    }
}

/// `pagination` block of a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

/// `data` block of a list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Decode a response body into an envelope, mapping failures to `ApiError`.
///
/// Non-2xx statuses use the envelope's `error` (or `message`) when the body
/// is one, otherwise a generic status message. A 2xx with `success: false`
/// is a rejected request.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<Envelope<T>, ApiError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Envelope<Value>>(body)
            .ok()
            .and_then(|env| env.error.or(env.message))
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        return Err(ApiError::from_status(status, message));
    }

    if body.trim().is_empty() {
        return Ok(Envelope {
            success: true,
            data: None,
            error: None,
            message: None,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if !envelope.success {
        let message = envelope
            .error
            .or(envelope.message)
            .unwrap_or_else(|| "Request was not successful".to_string());
        return Err(ApiError::BadRequest(message));
    }

    Ok(envelope)
}

/// Shorten a body for log output
pub fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
