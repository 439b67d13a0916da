//! Error types for the API client

use opendonate_core::error::{Error, ErrorCode};
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, body decode)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A service key is required but none is configured
    #[error("Missing API key for {0}")]
    MissingApiKey(&'static str),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }

    /// Convert into a workspace error under the given service code.
    ///
    /// Transport failures become `NetworkError`; configuration problems
    /// become `ConfigError`.
    pub fn into_service_error(self, code: ErrorCode) -> Error {
        let code = match &self {
            Self::Request(e) if e.is_connect() || e.is_timeout() => ErrorCode::NetworkError,
            Self::Config(_) | Self::MissingApiKey(_) => ErrorCode::ConfigError,
            _ => code,
        };
        let message = self.to_string();
        Error::service(code, message).with_source(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendonate_core::ErrorKind;

    #[test]
    fn test_status_classes() {
        assert!(ApiError::api_response(401, "unauthorized").is_client_error());
        assert!(ApiError::api_response(503, "down").is_server_error());
        assert!(!ApiError::api_response(503, "down").is_client_error());
    }

    #[test]
    fn test_into_service_error() {
        let err = ApiError::api_response(500, "boom").into_service_error(ErrorCode::GeocodingFailed);
        assert_eq!(err.code, ErrorCode::GeocodingFailed);
        assert_eq!(err.kind(), ErrorKind::Service);

        let err = ApiError::MissingApiKey("kakao").into_service_error(ErrorCode::SearchFailed);
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert!(err.message.contains("kakao"));
    }
}
