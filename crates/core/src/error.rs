//! Structured error handling with context and recovery suggestions
//!
//! Every error carries:
//! - A numeric code for programmatic handling
//! - Optional context and recovery suggestion
//! - A user-facing kind (permission, service, absence, invalid input) that
//!   callers convert into a UI state instead of aborting

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message shown when location permission is refused.
pub const MSG_PERMISSION_DENIED: &str =
    "위치 권한이 거부되었습니다. 브라우저 설정에서 권한을 허용해주세요.";

/// Message shown when a location cannot be acquired.
pub const MSG_LOCATION_UNAVAILABLE: &str =
    "위치를 가져올 수 없습니다. 인터넷 연결을 확인해주세요.";

/// Message shown when a resolved location cannot be applied.
pub const MSG_LOCATION_NOT_SET: &str = "위치를 설정할 수 없습니다.";

/// Generic message for failed network or storage calls.
pub const MSG_SERVICE_FAILURE: &str = "요청을 처리하지 못했습니다. 잠시 후 다시 시도해주세요.";

/// Message for missing posts.
pub const MSG_POST_NOT_FOUND: &str = "게시글을 찾을 수 없습니다.";

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,
    Timeout = 1003,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,

    // Location errors (4xxx)
    LocationError = 4000,
    LocationPermissionDenied = 4001,
    LocationTimeout = 4002,
    LocationUnavailable = 4003,

    // Service errors (5xxx)
    ServiceError = 5000,
    GeocodingFailed = 5001,
    SearchFailed = 5002,
    StorageFailed = 5003,
    NetworkError = 5004,

    // Validation errors (6xxx)
    ValidationError = 6000,
    InvalidInput = 6001,
    InvalidFormat = 6002,
    MalformedDocument = 6003,
    Unauthenticated = 6004,
    NotAuthor = 6005,

    // Data errors (7xxx)
    DataError = 7000,
    NotFound = 7001,
    DuplicateId = 7002,
}

/// User-facing error taxonomy.
///
/// Nothing here is fatal to the process; call sites turn each kind into a
/// visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// User refused a permission; shown as-is, never retried.
    Permission,
    /// Network or hosted-service failure; logged, generic message, abandoned.
    Service,
    /// Nothing matched. Rendered as an empty or guidance state.
    Absence,
    /// Bad input, configuration or stored document.
    Invalid,
    /// Local failure (IO, lock poisoning).
    Internal,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Location",
            5 => "Service",
            6 => "Validation",
            7 => "Data",
            _ => "Unknown",
        }
    }

    /// Classify the code into the user-facing taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LocationPermissionDenied => ErrorKind::Permission,
            Self::LocationError
            | Self::LocationTimeout
            | Self::LocationUnavailable
            | Self::Timeout
            | Self::ServiceError
            | Self::GeocodingFailed
            | Self::SearchFailed
            | Self::StorageFailed
            | Self::NetworkError => ErrorKind::Service,
            Self::NotFound => ErrorKind::Absence,
            Self::ConfigError
            | Self::ConfigNotFound
            | Self::ConfigParseError
            | Self::ConfigValidationError
            | Self::ValidationError
            | Self::InvalidInput
            | Self::InvalidFormat
            | Self::MalformedDocument
            | Self::Unauthenticated
            | Self::NotAuthor
            | Self::DataError
            | Self::DuplicateId => ErrorKind::Invalid,
            Self::Unknown
            | Self::Internal
            | Self::IoError
            | Self::FileNotFound
            | Self::PermissionDenied => ErrorKind::Internal,
        }
    }

    /// Message suitable for showing to an end user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::LocationPermissionDenied => MSG_PERMISSION_DENIED,
            Self::LocationError | Self::LocationTimeout | Self::LocationUnavailable => {
                MSG_LOCATION_UNAVAILABLE
            }
            Self::NotFound => MSG_POST_NOT_FOUND,
            Self::Unauthenticated => "로그인이 필요해요.",
            Self::NotAuthor => "작성자만 삭제할 수 있어요.",
            _ => MSG_SERVICE_FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {ctx}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// User-facing classification of this error
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    /// Message suitable for an end user (never the internal detail)
    pub fn user_message(&self) -> &'static str {
        self.code.user_message()
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            kind: self.kind(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(ToString::to_string),
        }
    }

    // Convenience constructors

    /// IO failure
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    /// Generic configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Explicit configuration path that does not exist
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .opendonate.toml file or use --config to specify a path")
    }

    /// Location permission refused by the user
    pub fn location_denied() -> Self {
        Self::new(ErrorCode::LocationPermissionDenied, MSG_PERMISSION_DENIED)
    }

    /// Location could not be acquired
    pub fn location_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::LocationUnavailable, message)
    }

    /// Hosted service failure
    pub fn service(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message)
    }

    /// Invalid input or document
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Document failed schema validation at the storage boundary
    pub fn malformed(id: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedDocument, message)
            .with_context(format!("document {id}"))
    }

    /// Record lookup miss
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, what)
    }

    /// Operation needs a signed-in session
    pub fn unauthenticated() -> Self {
        Self::new(ErrorCode::Unauthenticated, "Sign-in required")
            .with_suggestion("Sign in before writing to the community board")
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
#[allow(missing_docs)]
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const LOCATION_ERROR: i32 = 4;
    pub const SERVICE_ERROR: i32 = 5;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::InvalidFormat, format!("JSON parse error: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}"))
            .with_source(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::new(ErrorCode::InvalidFormat, format!("Regex error: {err}")).with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error, if any
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error, if any
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::LocationPermissionDenied.to_string(), "E4001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::GeocodingFailed.category(), "Service");
        assert_eq!(ErrorCode::MalformedDocument.category(), "Validation");
    }

    #[test]
    fn test_taxonomy() {
        assert_eq!(Error::location_denied().kind(), ErrorKind::Permission);
        assert_eq!(
            Error::service(ErrorCode::StorageFailed, "down").kind(),
            ErrorKind::Service
        );
        assert_eq!(Error::not_found("post 1").kind(), ErrorKind::Absence);
        assert_eq!(Error::malformed("p1", "bad").kind(), ErrorKind::Invalid);
    }

    #[test]
    fn test_user_messages_hide_detail() {
        let err = Error::service(ErrorCode::NetworkError, "connection reset by peer 10.0.0.1");
        assert_eq!(err.user_message(), MSG_SERVICE_FAILURE);
        assert_eq!(Error::location_denied().user_message(), MSG_PERMISSION_DENIED);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::config_not_found("/path/to/file").with_context("While loading configuration");

        assert_eq!(err.code, ErrorCode::ConfigNotFound);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::service(ErrorCode::GeocodingFailed, "Nominatim returned 503")
            .with_context("reverse geocoding");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E5001"));
        assert!(json.contains("\"kind\":\"service\""));
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(Error::validation("radius must be positive"));
        let err = result
            .context("loading [matching]")
            .with_suggestion("set matching.radius_km above 0")
            .unwrap_err();
        assert_eq!(err.context.as_deref(), Some("loading [matching]"));
        assert_eq!(err.suggestion.as_deref(), Some("set matching.radius_km above 0"));
    }
}
