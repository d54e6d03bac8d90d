//! Error types for the file search facade

use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for file search operations
pub type Result<T> = std::result::Result<T, Error>;

/// File search errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credential, bad address)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Remote service rejected the request
    #[error("{message}")]
    Remote {
        /// HTTP status returned by the remote service
        status: u16,
        /// Error message passed through from the remote service
        message: String,
    },

    /// Client supplied malformed input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP transport error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Closed classification of every [`Error`], used for status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    NotFound,
    InvalidInput,
    RemoteFailure,
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind of failure
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Config | ErrorKind::RemoteFailure | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl Error {
    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a remote failure error
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Remote { .. } | Error::Http(_) => ErrorKind::RemoteFailure,
            Error::Io(_) | Error::Json(_) | Error::Internal(_) => ErrorKind::Internal,
        }
    }
}

// Extractor rejections are client input errors and share the `{"detail"}` body
macro_rules! invalid_input_from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for Error {
                fn from(rejection: $rejection) -> Self {
                    Self::InvalidInput(rejection.body_text())
                }
            }
        )+
    };
}

invalid_input_from_rejection!(JsonRejection, QueryRejection, PathRejection, MultipartRejection);

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.kind().status_code();
        let detail = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", detail);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", detail);
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::not_found("fileSearchStores/abc").kind().status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::invalid_input("metadata must be a JSON object").kind().status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::remote(429, "quota exceeded").kind().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Config("GEMINI_API_KEY not set".into()).kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_remote_message_passthrough() {
        let err = Error::remote(400, "Cannot delete non-empty FileSearchStore");
        assert_eq!(err.to_string(), "Cannot delete non-empty FileSearchStore");
    }

    #[tokio::test]
    async fn test_response_body_carries_detail() {
        let response = Error::not_found("Requested entity was not found.").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["detail"], "Requested entity was not found.");
    }
}
