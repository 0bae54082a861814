//! Shared error type across httpdummy crates.

use thiserror::Error;

use crate::duration::DurationError;

/// Stable error codes, used in log fields and JSON error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid startup configuration.
    Config,
    /// Listen address unavailable.
    Bind,
    /// Malformed duration in a request path.
    BadTime,
    /// Metric name registered twice.
    DuplicateMetric,
    /// Template failed to parse or render.
    Template,
    /// Anything else.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Config => "CONFIG",
            ErrorCode::Bind => "BIND",
            ErrorCode::BadTime => "BAD_TIME",
            ErrorCode::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorCode::Template => "TEMPLATE",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HttpDummyError>;

/// Unified error type used by core and web.
#[derive(Debug, Error)]
pub enum HttpDummyError {
    #[error("config: {0}")]
    Config(String),
    #[error("bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("bad time: {0}")]
    BadTime(#[from] DurationError),
    #[error("metric already registered: {0}")]
    DuplicateMetric(String),
    #[error("template: {0}")]
    Template(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl HttpDummyError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            HttpDummyError::Config(_) => ErrorCode::Config,
            HttpDummyError::Bind { .. } => ErrorCode::Bind,
            HttpDummyError::BadTime(_) => ErrorCode::BadTime,
            HttpDummyError::DuplicateMetric(_) => ErrorCode::DuplicateMetric,
            HttpDummyError::Template(_) => ErrorCode::Template,
            HttpDummyError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True for errors caused by the client's request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, HttpDummyError::BadTime(_))
    }
}
