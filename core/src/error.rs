//! Error types for the WalkScore client.
//!
//! # Design
//! `WalkScoreError` is the one error callers see. Each condition a caller
//! may want to react to (no key, bad coordinates, try again later, network
//! down) has its own variant, and `ErrorKind` mirrors the variants as a
//! fieldless `Copy` enum so matching never depends on message text.
//!
//! `TransportError` is the narrower type an `HttpClient` implementation
//! returns when no response was received at all.

use crate::validate::{Constraint, ValidationError};

/// Discriminant of a `WalkScoreError`, used by the classifier and retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    InvalidInput,
    ScoreInProgress,
    QuotaExceeded,
    InternalService,
    Connection,
    Timeout,
    Tls,
    Binding,
    Service,
    Deserialization,
}

impl ErrorKind {
    /// Build the error for this kind carrying `message`. The result's
    /// `kind()` is always `self`.
    ///
    /// `InvalidInput` built this way is attributed to the service, since the
    /// classifier is the only caller that turns a kind back into an error.
    /// `Validation` has no field to name, so it is reported against the
    /// whole response.
    pub fn into_error(self, message: String, http_status: Option<u16>) -> WalkScoreError {
        match self {
            ErrorKind::Authentication => WalkScoreError::Authentication(message),
            ErrorKind::Authorization => WalkScoreError::Authorization(message),
            ErrorKind::InvalidInput => WalkScoreError::InvalidInput {
                origin: InputErrorOrigin::Service,
                message,
            },
            ErrorKind::ScoreInProgress => WalkScoreError::ScoreInProgress(message),
            ErrorKind::QuotaExceeded => WalkScoreError::QuotaExceeded(message),
            ErrorKind::InternalService => WalkScoreError::InternalService(message),
            ErrorKind::Connection => WalkScoreError::Connection(message),
            ErrorKind::Timeout => WalkScoreError::Timeout(message),
            ErrorKind::Tls => WalkScoreError::Tls(message),
            ErrorKind::Binding => WalkScoreError::Binding(message),
            ErrorKind::Deserialization => WalkScoreError::Deserialization(message),
            ErrorKind::Validation => {
                WalkScoreError::Validation(ValidationError::new("response", Constraint::Rejected(message)))
            }
            ErrorKind::Service => WalkScoreError::Service {
                status: http_status,
                message,
            },
        }
    }
}

/// Where an invalid-input error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputErrorOrigin {
    /// Latitude or longitude was not supplied.
    Missing,
    /// Latitude or longitude was NaN or infinite.
    NotNumeric,
    /// The service rejected the location (status 30 or HTTP 404).
    Service,
}

/// Errors returned by `ScoreClient` and `HttpClient`.
#[derive(Debug, thiserror::Error)]
pub enum WalkScoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No API key was configured, or the service rejected it.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The caller's IP address is blocked.
    #[error("caller is blocked: {0}")]
    Authorization(String),

    #[error("invalid input ({origin:?}): {message}")]
    InvalidInput {
        origin: InputErrorOrigin,
        message: String,
    },

    /// The score is still being computed; try again later.
    #[error("score is being calculated: {0}")]
    ScoreInProgress(String),

    #[error("daily quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("internal service error: {0}")]
    InternalService(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("TLS verification failed: {0}")]
    Tls(String),

    /// The client produced a request the transport could not send.
    #[error("malformed request: {0}")]
    Binding(String),

    /// Fallback for service failures with no more specific kind.
    #[error("service error (HTTP {status:?}): {message}")]
    Service {
        status: Option<u16>,
        message: String,
    },

    /// The response body could not be read as a score record.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl WalkScoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalkScoreError::Validation(_) => ErrorKind::Validation,
            WalkScoreError::Authentication(_) => ErrorKind::Authentication,
            WalkScoreError::Authorization(_) => ErrorKind::Authorization,
            WalkScoreError::InvalidInput { .. } => ErrorKind::InvalidInput,
            WalkScoreError::ScoreInProgress(_) => ErrorKind::ScoreInProgress,
            WalkScoreError::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            WalkScoreError::InternalService(_) => ErrorKind::InternalService,
            WalkScoreError::Connection(_) => ErrorKind::Connection,
            WalkScoreError::Timeout(_) => ErrorKind::Timeout,
            WalkScoreError::Tls(_) => ErrorKind::Tls,
            WalkScoreError::Binding(_) => ErrorKind::Binding,
            WalkScoreError::Service { .. } => ErrorKind::Service,
            WalkScoreError::Deserialization(_) => ErrorKind::Deserialization,
        }
    }

    /// Only timeouts are worth resending.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

/// A round-trip that produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("timed out: {0}")]
    Timeout(String),

    /// Refused, reset, or the host could not be resolved.
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("TLS failure: {0}")]
    Tls(String),

    /// The request itself was malformed (bad URL, bad header, bad proxy).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for WalkScoreError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(msg) => WalkScoreError::Timeout(msg),
            TransportError::Connection(msg) => WalkScoreError::Connection(msg),
            TransportError::Tls(msg) => WalkScoreError::Tls(msg),
            TransportError::InvalidRequest(msg) => WalkScoreError::Binding(msg),
            TransportError::Other(msg) => WalkScoreError::Service {
                status: None,
                message: msg,
            },
        }
    }
}
