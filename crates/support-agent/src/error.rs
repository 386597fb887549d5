//! Error types for the support agent

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Support agent errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credential, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// FAQ source document does not exist
    #[error("FAQ file not found: {0}")]
    DocumentNotFound(String),

    /// FAQ source document could not be parsed
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Text-generation backend failed (network, quota, bad status, malformed body)
    #[error("LLM error: {0}")]
    Llm(String),

    /// A backend call or a whole request exceeded its time budget
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Backend output did not follow the structured response contract
    #[error("Backend contract violation: {0}")]
    Contract(String),

    /// The controller asked for a responder that is not registered
    #[error("Unknown responder: {0}")]
    UnknownResponder(String),

    /// Malformed inbound request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create a contract violation error
    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract(message.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// True for failures caused by the text-generation backend
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Error::Llm(_)
                | Error::Timeout(_)
                | Error::Contract(_)
                | Error::UnknownResponder(_)
                | Error::Http(_)
        )
    }

    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::DocumentNotFound(_) => (StatusCode::INTERNAL_SERVER_ERROR, "not_found"),
            Error::FileParse { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "parse_error"),
            Error::Llm(_) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error"),
            Error::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            Error::Contract(_) => (StatusCode::BAD_GATEWAY, "contract_error"),
            Error::UnknownResponder(_) => (StatusCode::BAD_GATEWAY, "unknown_responder"),
            Error::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, "http_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        if self.is_backend_failure() {
            tracing::warn!("Request failed upstream ({}): {}", error_type, self);
        } else if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", error_type, self);
        }

        let body = Json(json!({
            "detail": self.to_string(),
            "type": error_type,
        }));

        (status, body).into_response()
    }
}
