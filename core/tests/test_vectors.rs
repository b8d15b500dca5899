//! Verify classification and build/parse against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use std::time::Duration;

use walkscore_core::{
    classify::{check_response, service_status},
    classify, ClientConfig, ErrorKind, HttpClient, HttpMethod, HttpRequest, HttpResponse, ScoreClient,
    ScoreQuery, Shape, TransportError,
};

const BASE_URL: &str = "http://localhost:3000";

/// Transport that must never be called; vectors drive build/parse directly.
struct Offline;

impl HttpClient for Offline {
    fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::Other("offline".into()))
    }
}

fn client() -> ScoreClient {
    let config = ClientConfig::new("vector-key")
        .with_base_url(BASE_URL)
        .with_backoff(Duration::ZERO, Duration::ZERO);
    ScoreClient::with_http_client(config, Offline)
}

/// Parse the kind names used in vectors into `ErrorKind`.
fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "Authentication" => ErrorKind::Authentication,
        "Authorization" => ErrorKind::Authorization,
        "InvalidInput" => ErrorKind::InvalidInput,
        "ScoreInProgress" => ErrorKind::ScoreInProgress,
        "QuotaExceeded" => ErrorKind::QuotaExceeded,
        "InternalService" => ErrorKind::InternalService,
        "Timeout" => ErrorKind::Timeout,
        "Tls" => ErrorKind::Tls,
        "Service" => ErrorKind::Service,
        other => panic!("unknown error kind: {other}"),
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn classify_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let http_status = case["http_status"].as_u64().unwrap() as u16;
        let body = case["body"].as_str().unwrap();
        let expected = case["expected_kind"].as_str().map(parse_kind);

        assert_eq!(classify(http_status, service_status(body)), expected, "{name}: classify");

        let response = HttpResponse {
            status: http_status,
            headers: Vec::new(),
            body: body.to_string(),
        };
        let checked = check_response(&response).err().map(|e| e.kind());
        assert_eq!(checked, expected, "{name}: check_response");
    }
}

// ---------------------------------------------------------------------------
// Get score
// ---------------------------------------------------------------------------

#[test]
fn get_score_test_vectors() {
    let raw = include_str!("../../test-vectors/get_score.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let query = ScoreQuery {
            latitude: input["latitude"].as_f64(),
            longitude: input["longitude"].as_f64(),
            address: input["address"].as_str().map(str::to_string),
            include_transit: input["include_transit"].as_bool().unwrap(),
            include_bike: input["include_bike"].as_bool().unwrap(),
            max_retries: None,
        };
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_get_score(&query).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let expected_query: Vec<(String, String)> = expected_req["query"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| {
                let arr = pair.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.query, expected_query, "{name}: query");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = c.parse_get_score(response, &query);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(err.kind(), parse_kind(expected_error.as_str().unwrap()), "{name}: error kind");
        } else {
            let record = result.unwrap();
            assert_eq!(
                record.to_representation(Shape::Normalized),
                case["expected_result"],
                "{name}: parsed result"
            );
        }
    }
}
