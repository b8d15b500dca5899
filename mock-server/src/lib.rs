use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Key that authenticates but has used up its daily quota.
pub const OVER_QUOTA_KEY: &str = "over-quota";
/// Key whose caller is IP-blocked; answered with HTTP 403.
pub const BLOCKED_KEY: &str = "blocked";
/// Address whose score is still being calculated.
pub const PENDING_ADDRESS: &str = "pending";
/// Address that makes the mock fail internally with HTTP 500.
pub const BROKEN_ADDRESS: &str = "broken";

pub const LOGO_URL: &str = "https://cdn.walk.sc/images/api-logo.png";
pub const MORE_INFO_ICON: &str = "https://cdn.walk.sc/images/api-more-info.gif";
pub const HELP_LINK: &str = "https://www.redfin.com/how-walk-score-works";

#[derive(Debug, Deserialize)]
pub struct ScoreParams {
    pub address: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub format: Option<String>,
    pub transit: Option<String>,
    pub bike: Option<String>,
    pub wsapikey: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Transit {
    pub score: i64,
    pub description: String,
    pub summary: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bike {
    pub score: i64,
    pub description: String,
}

/// A successful lookup, in the service's response layout.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Score {
    pub status: i64,
    pub walkscore: i64,
    pub description: String,
    pub updated: String,
    pub logo_url: String,
    pub more_info_icon: String,
    pub more_info_link: String,
    pub ws_link: String,
    pub help_link: String,
    pub snapped_lat: f64,
    pub snapped_lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit: Option<Transit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bike: Option<Bike>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Failure {
    pub status: i64,
    pub message: String,
}

pub type ApiKey = Arc<String>;

pub fn app(api_key: impl Into<String>) -> Router {
    let key: ApiKey = Arc::new(api_key.into());
    Router::new().route("/score", get(get_score)).with_state(key)
}

pub async fn run(listener: TcpListener, api_key: impl Into<String>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn failure(http: StatusCode, status: i64, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    let body = Failure {
        status,
        message: message.to_string(),
    };
    (http, Json(serde_json::to_value(body).unwrap_or_default()))
}

fn describe_walk(score: i64) -> &'static str {
    match score {
        90..=100 => "Walker's Paradise",
        70..=89 => "Very Walkable",
        50..=69 => "Somewhat Walkable",
        25..=49 => "Car-Dependent",
        _ => "Almost All Errands Require a Car",
    }
}

/// Deterministic 0..=100 score derived from a coordinate.
fn derive_score(value: f64, salt: u64) -> i64 {
    (((value.abs() * 10_000.0) as u64).wrapping_add(salt) % 101) as i64
}

fn snap(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

async fn get_score(
    State(key): State<ApiKey>,
    Query(params): Query<ScoreParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    let supplied = params.wsapikey.as_deref().unwrap_or_default();
    if supplied == BLOCKED_KEY {
        return failure(StatusCode::FORBIDDEN, 42, "IP address is blocked");
    }
    if supplied == OVER_QUOTA_KEY {
        return failure(StatusCode::OK, 41, "Daily API quota exceeded");
    }
    if supplied.is_empty() || supplied != key.as_str() {
        return failure(StatusCode::OK, 40, "Invalid API key");
    }

    let coords = params
        .lat
        .as_deref()
        .and_then(|s| s.parse::<f64>().ok())
        .zip(params.lon.as_deref().and_then(|s| s.parse::<f64>().ok()));
    let Some((lat, lon)) = coords else {
        return failure(StatusCode::OK, 30, "Invalid latitude/longitude");
    };

    match params.address.as_deref() {
        Some(PENDING_ADDRESS) => return failure(StatusCode::OK, 2, "Score is being calculated"),
        Some(BROKEN_ADDRESS) => {
            return failure(StatusCode::INTERNAL_SERVER_ERROR, 31, "Walk Score API internal error")
        }
        _ => {}
    }

    let walkscore = derive_score(lat, 0);
    let score = Score {
        status: 1,
        walkscore,
        description: describe_walk(walkscore).to_string(),
        updated: "2009-12-25 03:40:16.006257".to_string(),
        logo_url: LOGO_URL.to_string(),
        more_info_icon: MORE_INFO_ICON.to_string(),
        more_info_link: HELP_LINK.to_string(),
        ws_link: format!("https://www.walkscore.com/score/loc/lat={lat}/lng={lon}/"),
        help_link: HELP_LINK.to_string(),
        snapped_lat: snap(lat),
        snapped_lon: snap(lon),
        transit: params.transit.as_ref().map(|_| Transit {
            score: derive_score(lon, 7),
            description: "Good Transit".to_string(),
            summary: "12 nearby routes: 10 bus, 2 rail".to_string(),
        }),
        bike: params.bike.as_ref().map(|_| Bike {
            score: derive_score(lat + lon, 13),
            description: "Bikeable".to_string(),
        }),
    };
    (StatusCode::OK, Json(serde_json::to_value(score).unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_scores_stay_in_range() {
        for v in [0.0, 47.6085, -122.3295, 89.9999, 1e9] {
            let s = derive_score(v, 13);
            assert!((0..=100).contains(&s), "{v} -> {s}");
        }
    }

    #[test]
    fn snapping_rounds_to_three_places() {
        assert_eq!(snap(47.60854), 47.609);
        assert_eq!(snap(-122.32949), -122.329);
    }
}
