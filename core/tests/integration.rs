//! End-to-end lookups against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `ScoreClient`
//! through the default `UreqClient` over real HTTP, checking that request
//! building, classification and deserialization agree with the server.

use std::net::SocketAddr;
use std::time::Duration;

use walkscore_core::{
    ClientConfig, ErrorKind, InputErrorOrigin, ScoreClient, ScoreQuery, Shape, WalkScoreError,
};

const KEY: &str = "integration-key";

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, KEY).await
        })
        .unwrap();
    });
    addr
}

fn client(addr: SocketAddr, api_key: &str) -> ScoreClient {
    let config = ClientConfig::new(api_key)
        .with_base_url(format!("http://{addr}"))
        .with_timeout(Duration::from_secs(10))
        .with_backoff(Duration::ZERO, Duration::ZERO);
    ScoreClient::new(config).unwrap()
}

fn seattle() -> ScoreQuery {
    ScoreQuery::new(47.6085, -122.3295).address("1119 8th Avenue Seattle, WA 98101")
}

#[test]
fn score_lifecycle() {
    let addr = start_server();
    let client = client(addr, KEY);

    // Step 1: full lookup with every group.
    let record = client.get_score(&seattle()).unwrap();
    assert!(record.is_success());
    assert!(record.walk_score().is_some());
    assert!(record.transit_score().is_some());
    assert!(record.bike_score().is_some());
    let (snapped_lon, snapped_lat) = record.snapped_coordinates();
    assert!((snapped_lat.unwrap() - 47.6085).abs() < 0.001);
    assert!((snapped_lon.unwrap() + 122.3295).abs() < 0.001);
    assert_eq!(record.original_coordinates(), (Some(-122.3295), Some(47.6085)));
    assert_eq!(record.address(), Some("1119 8th Avenue Seattle, WA 98101"));
    assert!(record.walk_updated().is_some());

    // Step 2: opting out of transit and bike leaves those groups empty.
    let record = client.get_score(&seattle().transit(false).bike(false)).unwrap();
    assert!(record.is_success());
    assert_eq!(record.transit_score(), None);
    assert_eq!(record.bike_score(), None);

    // Step 3: no address, coordinates only.
    let record = client.get_score(&ScoreQuery::new(40.7128, -74.006)).unwrap();
    assert!(record.is_success());
    assert_eq!(record.address(), None);

    // Step 4: the wire form of a live response reads back identically.
    let wire = record.to_json(Shape::Wire);
    let mut reread = walkscore_core::LocationScore::from_json(&wire, Shape::Wire).unwrap();
    reread.set_original_coordinates(Some(-74.006), Some(40.7128)).unwrap();
    assert_eq!(reread, record);
}

#[test]
fn service_failures_are_typed() {
    let addr = start_server();

    let err = client(addr, "wrong-key").get_score(&seattle()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert!(err.to_string().contains("Invalid API key"));

    let err = client(addr, mock_server::OVER_QUOTA_KEY).get_score(&seattle()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QuotaExceeded);

    let err = client(addr, mock_server::BLOCKED_KEY).get_score(&seattle()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let pending = ScoreQuery::new(1.0, 2.0).address(mock_server::PENDING_ADDRESS);
    let err = client(addr, KEY).get_score(&pending).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ScoreInProgress);

    let broken = ScoreQuery::new(1.0, 2.0).address(mock_server::BROKEN_ADDRESS);
    let err = client(addr, KEY).get_score(&broken).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InternalService);
}

#[test]
fn request_shape_errors_never_reach_the_server() {
    // No server is started: these must fail before any I/O.
    let unused: SocketAddr = "127.0.0.1:9".parse().unwrap();

    let keyless = ScoreClient::new(ClientConfig::default().with_base_url(format!("http://{unused}"))).unwrap();
    let err = keyless.get_score(&seattle()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);

    let half = ScoreQuery {
        latitude: Some(47.6085),
        ..ScoreQuery::default()
    };
    let err = client(unused, KEY).get_score(&half).unwrap_err();
    assert!(matches!(
        err,
        WalkScoreError::InvalidInput {
            origin: InputErrorOrigin::Missing,
            ..
        }
    ));
}

#[test]
fn unreachable_service_is_a_connection_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let addr: SocketAddr = format!("127.0.0.1:{port}").parse().unwrap();
    let err = client(addr, KEY).get_score(&seattle()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
}
