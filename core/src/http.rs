//! HTTP request/response types and the pluggable client trait.
//!
//! # Design
//! Requests and responses are plain data. `ScoreClient` builds an
//! `HttpRequest`, an `HttpClient` implementation executes it, and the
//! resulting `HttpResponse` is classified before anything is deserialized.
//! All per-call parameters live in the `HttpRequest` value, so a single
//! client can be shared between threads without callers seeing each
//! other's query strings.
//!
//! Implementors supply only `execute`. `send` and `send_with_retry` are
//! provided and carry the classification and backoff behavior.

use tracing::debug;

use crate::classify::check_response;
use crate::error::{TransportError, WalkScoreError};
use crate::retry::{self, RetryPolicy};

/// Query parameters whose values never reach the logs.
const REDACTED_PARAMS: &[&str] = &["wsapikey"];

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Value of the first query parameter named `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Query string suitable for logs, with credentials masked.
    pub fn redacted_query(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| {
                if REDACTED_PARAMS.contains(&k.as_str()) {
                    format!("{k}=***")
                } else {
                    format!("{k}={v}")
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// A transport able to perform one HTTP round-trip.
///
/// `execute` returns `Ok` for every response that arrived, whatever its
/// status code; only failures that produced no response are `Err`.
pub trait HttpClient: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Execute `request` once and classify the response.
    ///
    /// Returns the response only when the classifier reports no error.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, WalkScoreError> {
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            query = %request.redacted_query(),
            "sending request"
        );
        let response = self.execute(request)?;
        debug!(status = response.status, "received response");
        check_response(&response)?;
        Ok(response)
    }

    /// `send` wrapped in exponential backoff; only timeouts are retried.
    fn send_with_retry(
        &self,
        request: &HttpRequest,
        policy: &RetryPolicy,
    ) -> Result<HttpResponse, WalkScoreError> {
        retry::run(policy, || self.send(request))
    }
}

impl<T: HttpClient + ?Sized> HttpClient for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
