//! Request builder, response parser and facade for the score endpoint.
//!
//! # Design
//! Like the rest of the crate, `ScoreClient` keeps the I/O boundary
//! explicit: `build_get_score` produces an `HttpRequest`, and
//! `parse_get_score` consumes an `HttpResponse`. `get_score` runs the two
//! around the configured `HttpClient` with the retry policy. Callers that
//! want to drive the network themselves can use the halves directly.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::classify::check_response;
use crate::config::ClientConfig;
use crate::error::{InputErrorOrigin, WalkScoreError};
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::score::LocationScore;
use crate::wire::Shape;

const SCORE_PATH: &str = "/score";

/// What to look up. Latitude and longitude are both required; the address
/// is sent alongside them when present.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub include_transit: bool,
    pub include_bike: bool,
    /// Overrides `ClientConfig::max_retries` for this call.
    pub max_retries: Option<u32>,
}

impl Default for ScoreQuery {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            address: None,
            include_transit: true,
            include_bike: true,
            max_retries: None,
        }
    }
}

impl ScoreQuery {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn transit(mut self, include: bool) -> Self {
        self.include_transit = include;
        self
    }

    pub fn bike(mut self, include: bool) -> Self {
        self.include_bike = include;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    fn coordinates(&self) -> Result<(f64, f64), WalkScoreError> {
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Err(WalkScoreError::InvalidInput {
                origin: InputErrorOrigin::Missing,
                message: "latitude and longitude are both required".to_string(),
            });
        };
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(WalkScoreError::InvalidInput {
                origin: InputErrorOrigin::NotNumeric,
                message: format!("coordinates must be finite numbers, got ({latitude}, {longitude})"),
            });
        }
        Ok((latitude, longitude))
    }
}

/// Client for the score endpoint.
#[derive(Clone)]
pub struct ScoreClient {
    config: ClientConfig,
    http: Arc<dyn HttpClient>,
}

impl fmt::Debug for ScoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreClient")
            .field("base_url", &self.config.base_url)
            .field("has_api_key", &self.config.api_key().is_some())
            .finish_non_exhaustive()
    }
}

impl ScoreClient {
    /// Client using the default `ureq` transport.
    #[cfg(feature = "ureq")]
    pub fn new(config: ClientConfig) -> Result<Self, WalkScoreError> {
        let http = crate::transport::UreqClient::from_config(&config)?;
        Ok(Self::with_http_client(config, http))
    }

    /// Client using a caller-supplied transport.
    pub fn with_http_client(config: ClientConfig, http: impl HttpClient + 'static) -> Self {
        Self {
            config,
            http: Arc::new(http),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}{SCORE_PATH}", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the request for `query`.
    ///
    /// Fails before any I/O when no key is configured or the coordinates are
    /// missing or not finite.
    pub fn build_get_score(&self, query: &ScoreQuery) -> Result<HttpRequest, WalkScoreError> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| WalkScoreError::Authentication("no API key supplied".to_string()))?;
        let (latitude, longitude) = query.coordinates()?;

        let mut params = Vec::with_capacity(7);
        if let Some(address) = query.address.as_deref().filter(|a| !a.is_empty()) {
            params.push(("address", address.to_string()));
        }
        params.push(("lat", latitude.to_string()));
        params.push(("lon", longitude.to_string()));
        params.push(("format", "json".to_string()));
        // The service treats a missing flag as "do not include".
        if query.include_transit {
            params.push(("transit", "1".to_string()));
        }
        if query.include_bike {
            params.push(("bike", "1".to_string()));
        }
        params.push(("wsapikey", api_key.to_string()));

        let mut request = HttpRequest::get(self.endpoint());
        request.query = params.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        Ok(request)
    }

    /// Classify `response` and read the score, echoing the query's address
    /// and coordinates onto the record.
    pub fn parse_get_score(
        &self,
        response: HttpResponse,
        query: &ScoreQuery,
    ) -> Result<LocationScore, WalkScoreError> {
        check_response(&response)?;
        Self::read_score(&response, query)
    }

    /// Read an already classified response.
    fn read_score(response: &HttpResponse, query: &ScoreQuery) -> Result<LocationScore, WalkScoreError> {
        let mut record = LocationScore::from_json(&response.body, Shape::Wire)?;
        record.set_address(query.address.clone());
        record.set_original_coordinates(query.longitude, query.latitude)?;
        debug!(status = ?record.status(), walk_score = ?record.walk_score(), "parsed score");
        Ok(record)
    }

    /// Look up the scores for `query`, retrying timed-out attempts.
    pub fn get_score(&self, query: &ScoreQuery) -> Result<LocationScore, WalkScoreError> {
        let request = self.build_get_score(query)?;
        let policy = self.config.retry_policy(query.max_retries);
        // `send` has already classified the response.
        let response = self.http.send_with_retry(&request, &policy)?;
        Self::read_score(&response, query)
    }
}
