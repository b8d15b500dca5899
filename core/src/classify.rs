//! Map HTTP and service status codes to error kinds.
//!
//! # Design
//! The service reports some failures through the HTTP status and others
//! through a `status` field in an HTTP 200 body (invalid coordinates, quota,
//! bad key). Resolution order:
//!
//! 1. transport-level failures never reach this module; they are already
//!    typed by `TransportError`,
//! 2. the HTTP status table, where any unlisted status of 500 or above is
//!    an internal error,
//! 3. the body's `status` field against the service table,
//! 4. anything else is success.

use serde_json::Value;
use tracing::debug;

use crate::error::{ErrorKind, WalkScoreError};
use crate::http::HttpResponse;

/// The service's status code for a successful lookup.
pub const SUCCESS_STATUS: i64 = 1;

fn http_status_kind(status: u16) -> Option<ErrorKind> {
    match status {
        401 => Some(ErrorKind::Authentication),
        403 => Some(ErrorKind::Authorization),
        404 => Some(ErrorKind::InvalidInput),
        409 => Some(ErrorKind::Service),
        495 => Some(ErrorKind::Tls),
        504 => Some(ErrorKind::Timeout),
        s if s >= 500 => Some(ErrorKind::InternalService),
        _ => None,
    }
}

fn service_status_kind(status: i64) -> Option<ErrorKind> {
    match status {
        2 => Some(ErrorKind::ScoreInProgress),
        30 => Some(ErrorKind::InvalidInput),
        31 => Some(ErrorKind::InternalService),
        40 => Some(ErrorKind::Authentication),
        41 => Some(ErrorKind::QuotaExceeded),
        _ => None,
    }
}

/// Classify a completed response. `None` means success.
pub fn classify(http_status: u16, service_status: Option<i64>) -> Option<ErrorKind> {
    http_status_kind(http_status).or_else(|| service_status.and_then(service_status_kind))
}

/// The `status` field of a JSON body, if the body is a JSON object with an
/// integer status.
pub fn service_status(body: &str) -> Option<i64> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("status")?.as_i64()
}

/// Human-readable message for an error response: the body's `message`
/// field when present, otherwise the raw body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Turn a classified response into `Err` when it carries a failure.
pub fn check_response(response: &HttpResponse) -> Result<(), WalkScoreError> {
    let status = service_status(&response.body);
    match classify(response.status, status) {
        None => Ok(()),
        Some(kind) => {
            debug!(http_status = response.status, service_status = ?status, ?kind, "response classified as error");
            Err(kind.into_error(error_message(&response.body), Some(response.status)))
        }
    }
}
