//! Synchronous client for the WalkScore score API.
//!
//! # Overview
//! Looks up walk, transit and bike scores for a location and returns them
//! as a validated `LocationScore`. Failures are typed: callers can tell a
//! missing key from bad coordinates, a score still being computed, an
//! exhausted quota or a network problem by matching on `WalkScoreError` or
//! its `ErrorKind`.
//!
//! # Design
//! - `ScoreClient` splits each call into `build_get_score` (produces an
//!   `HttpRequest`) and `parse_get_score` (consumes an `HttpResponse`), and
//!   `get_score` runs both around an `HttpClient`.
//! - `HttpClient` is the transport seam. `UreqClient` is the default
//!   implementation (cargo feature `ureq`); any other can be injected.
//! - Responses are classified by HTTP status first, then by the body's
//!   `status` field, before deserialization.
//! - `LocationScore` reads and writes two JSON shapes: the service's own
//!   (`Shape::Wire`) and a grouped one (`Shape::Normalized`).

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod retry;
pub mod score;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod validate;
pub mod wire;

pub use classify::classify;
pub use client::{ScoreClient, ScoreQuery};
pub use config::ClientConfig;
pub use error::{ErrorKind, InputErrorOrigin, TransportError, WalkScoreError};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use retry::RetryPolicy;
pub use score::{LocationScore, LocationScoreBuilder};
#[cfg(feature = "ureq")]
pub use transport::UreqClient;
pub use validate::{Constraint, ValidationError};
pub use wire::Shape;
