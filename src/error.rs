// Client-side API Error Types
use serde_json::{json, Value};
use thiserror::Error;

/// Errors surfaced by the API client and the session layer.
///
/// HTTP failures keep the status taxonomy of the server so callers can
/// branch on it; transport and decoding failures get their own variants.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict
    #[error("{0}")]
    Conflict(String),

    // 422 Unprocessable Entity
    #[error("{0}")]
    UnprocessableEntity(String),

    // 429 Too Many Requests
    #[error("{0}")]
    TooManyRequests(String),

    // Any other non-success status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered but the body was not the expected envelope.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Credential storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An operation needing a session was called without one.
    #[error("Not authenticated")]
    NotAuthenticated,
}

impl ApiError {
    /// Build an error from a non-success HTTP status and the server's message
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            422 => ApiError::UnprocessableEntity(message),
            429 => ApiError::TooManyRequests(message),
            _ => ApiError::Server { status, message },
        }
    }

    /// HTTP status code, when the error came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::UnprocessableEntity(_) => Some(422),
            ApiError::TooManyRequests(_) => Some(429),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(_)
            | ApiError::InvalidResponse(_)
            | ApiError::Storage(_)
            | ApiError::NotAuthenticated => None,
        }
    }

    /// Human-readable message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::UnprocessableEntity(msg) => msg,
            ApiError::TooManyRequests(msg) => msg,
            ApiError::Server { message, .. } => message,
            ApiError::Network(msg) => msg,
            ApiError::InvalidResponse(msg) => msg,
            ApiError::Storage(msg) => msg,
            ApiError::NotAuthenticated => "Not authenticated",
        }
    }

    /// Stable error code for scripted callers
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            ApiError::TooManyRequests(_) => "TOO_MANY_REQUESTS",
            ApiError::Server { .. } => "SERVER_ERROR",
            ApiError::Network(_) => "NETWORK_ERROR",
            ApiError::InvalidResponse(_) => "INVALID_RESPONSE",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::NotAuthenticated => "NOT_AUTHENTICATED",
        }
    }

    /// True when the server rejected the credentials themselves
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Convert to the JSON shape printed by the CLI
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code(),
        });

        if let Some(status) = self.status_code() {
            body["status"] = json!(status);
        }

        body
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}
