//! Default `HttpClient` built on `ureq`.
//!
//! # Design
//! The agent is configured with `http_status_as_error(false)` so 4xx/5xx
//! responses come back as data and reach the classifier. `ureq::Agent` is a
//! cheap, thread-safe handle; the request parameters are taken from each
//! `HttpRequest`, never stored on the client.

use std::fmt;
use std::io;
use std::time::Duration;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{TransportError, WalkScoreError};
use crate::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::validate;

#[derive(Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqClient").finish_non_exhaustive()
    }
}

impl UreqClient {
    pub fn new(timeout: Duration, proxy: Option<&str>) -> Result<Self, WalkScoreError> {
        let mut builder = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout));
        if let Some(proxy) = proxy.filter(|p| !p.is_empty()) {
            validate::check_url(proxy, "proxy")?;
            let proxy = ureq::Proxy::new(proxy).map_err(|e| WalkScoreError::Binding(e.to_string()))?;
            builder = builder.proxy(Some(proxy));
        }
        Ok(Self {
            agent: builder.build().new_agent(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, WalkScoreError> {
        Self::new(config.timeout(), config.proxy.as_deref())
    }
}

fn with_params<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (key, value) in &request.query {
        builder = builder.query(key.as_str(), value.as_str());
    }
    for (key, value) in &request.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn map_error(err: ureq::Error) -> TransportError {
    let message = err.to_string();
    match &err {
        ureq::Error::Timeout(_) => TransportError::Timeout(message),
        ureq::Error::ConnectionFailed | ureq::Error::HostNotFound => TransportError::Connection(message),
        ureq::Error::Io(io_err) => match io_err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportError::Timeout(message),
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected => TransportError::Connection(message),
            _ => TransportError::Other(message),
        },
        ureq::Error::Tls(_) | ureq::Error::Rustls(_) => TransportError::Tls(message),
        ureq::Error::BadUri(_) | ureq::Error::Http(_) | ureq::Error::InvalidProxyUrl => {
            TransportError::InvalidRequest(message)
        }
        _ => TransportError::Other(message),
    }
}

impl HttpClient for UreqClient {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match request.method {
            HttpMethod::Get => with_params(self.agent.get(&request.url), request).call(),
            HttpMethod::Post => {
                let builder = with_params(self.agent.post(&request.url), request);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(map_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string().map_err(map_error)?;
        debug!(status, bytes = body.len(), "ureq round-trip complete");

        Ok(HttpResponse { status, headers, body })
    }
}
