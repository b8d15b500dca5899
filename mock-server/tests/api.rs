use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Failure, Score, BLOCKED_KEY, BROKEN_ADDRESS, OVER_QUOTA_KEY, PENDING_ADDRESS};
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(uri: &str) -> axum::response::Response {
    app(KEY)
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap()
}

// --- success ---

#[tokio::test]
async fn score_with_all_groups() {
    let resp = get("/score?lat=47.6085&lon=-122.3295&format=json&transit=1&bike=1&wsapikey=test-key").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let score: Score = body_json(resp).await;
    assert_eq!(score.status, 1);
    assert!((0..=100).contains(&score.walkscore));
    assert!((score.snapped_lat - 47.6085).abs() < 0.001);
    assert!(score.transit.is_some());
    assert!(score.bike.is_some());
}

#[tokio::test]
async fn absent_flags_omit_groups() {
    let resp = get("/score?lat=47.6085&lon=-122.3295&format=json&wsapikey=test-key").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body.get("transit").is_none());
    assert!(body.get("bike").is_none());
    assert_eq!(body["status"], 1);
}

// --- service-level failures ---

#[tokio::test]
async fn wrong_key_is_status_40() {
    let resp = get("/score?lat=1&lon=2&wsapikey=nope").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let failure: Failure = body_json(resp).await;
    assert_eq!(failure.status, 40);
}

#[tokio::test]
async fn missing_key_is_status_40() {
    let resp = get("/score?lat=1&lon=2").await;
    let failure: Failure = body_json(resp).await;
    assert_eq!(failure.status, 40);
}

#[tokio::test]
async fn bad_coordinates_are_status_30() {
    let resp = get("/score?lat=north&lon=2&wsapikey=test-key").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let failure: Failure = body_json(resp).await;
    assert_eq!(failure.status, 30);
}

#[tokio::test]
async fn quota_key_is_status_41() {
    let resp = get(&format!("/score?lat=1&lon=2&wsapikey={OVER_QUOTA_KEY}")).await;
    let failure: Failure = body_json(resp).await;
    assert_eq!(failure.status, 41);
}

#[tokio::test]
async fn pending_address_is_status_2() {
    let resp = get(&format!("/score?address={PENDING_ADDRESS}&lat=1&lon=2&wsapikey=test-key")).await;
    let failure: Failure = body_json(resp).await;
    assert_eq!(failure.status, 2);
}

// --- HTTP-level failures ---

#[tokio::test]
async fn blocked_key_is_forbidden() {
    let resp = get(&format!("/score?lat=1&lon=2&wsapikey={BLOCKED_KEY}")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn broken_address_is_internal_error() {
    let resp = get(&format!("/score?address={BROKEN_ADDRESS}&lat=1&lon=2&wsapikey=test-key")).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let failure: Failure = body_json(resp).await;
    assert_eq!(failure.status, 31);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = get("/walk").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
