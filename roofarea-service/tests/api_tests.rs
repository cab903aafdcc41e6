//! Integration tests for the HTTP API.
//!
//! The geocoding and roof segment providers are replaced by a local axum
//! server bound to an ephemeral port.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    routing::get,
    Router,
};
use axum_test::TestServer;
use roofarea::RoofAreaResolver;
use roofarea_service::{app, AppState};
use serde_json::{json, Value};

const TEST_KEY: &str = "test-google-key";
const ADDRESS: &str = "1600 Amphitheatre Parkway, Mountain View, CA";

/// Nothing listens on the discard port, so requests to it fail to connect.
const UNREACHABLE: &str = "http://127.0.0.1:9";

type Calls = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Canned upstream responses plus a record of the queries received.
#[derive(Clone)]
struct MockState {
    geocode: (StatusCode, String),
    roof: (StatusCode, String),
    geocode_calls: Calls,
    roof_calls: Calls,
}

struct Upstream {
    addr: SocketAddr,
    geocode_calls: Calls,
    roof_calls: Calls,
}

impl Upstream {
    fn geocode_calls(&self) -> Vec<HashMap<String, String>> {
        self.geocode_calls.lock().unwrap().clone()
    }

    fn roof_calls(&self) -> Vec<HashMap<String, String>> {
        self.roof_calls.lock().unwrap().clone()
    }
}

async fn mock_geocode(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    state.geocode_calls.lock().unwrap().push(query);
    state.geocode.clone()
}

async fn mock_roof(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    state.roof_calls.lock().unwrap().push(query);
    state.roof.clone()
}

/// Start a mock provider answering with the given status and body per endpoint.
async fn spawn_upstream(geocode: (StatusCode, String), roof: (StatusCode, String)) -> Upstream {
    let state = MockState {
        geocode,
        roof,
        geocode_calls: Calls::default(),
        roof_calls: Calls::default(),
    };
    let upstream_calls = (state.geocode_calls.clone(), state.roof_calls.clone());

    let router = Router::new()
        .route("/maps/api/geocode/json", get(mock_geocode))
        .route("/v1/roofSegments", get(mock_roof))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Upstream {
        addr,
        geocode_calls: upstream_calls.0,
        roof_calls: upstream_calls.1,
    }
}

fn geocode_ok(lat: f64, lng: f64) -> (StatusCode, String) {
    let body = json!({
        "results": [{
            "formatted_address": ADDRESS,
            "geometry": {"location": {"lat": lat, "lng": lng}}
        }],
        "status": "OK"
    });
    (StatusCode::OK, body.to_string())
}

fn roof_ok(area: f64, polygon: Value) -> (StatusCode, String) {
    let body = json!({"roofSegments": [{"areaMeters2": area, "polygon": polygon}]});
    (StatusCode::OK, body.to_string())
}

fn sample_polygon() -> Value {
    json!([[37.4221, -122.0841], [37.4222, -122.0841], [37.4222, -122.0842]])
}

fn resolver_for(base: &str) -> RoofAreaResolver {
    RoofAreaResolver::builder()
        .api_key(TEST_KEY)
        .geocode_url(format!("{}/maps/api/geocode/json", base))
        .roof_segments_url(format!("{}/v1/roofSegments", base))
        .timeout_secs(5)
        .build()
        .unwrap()
}

fn create_test_server(resolver: RoofAreaResolver, api_secret: Option<&str>) -> TestServer {
    let state = Arc::new(AppState {
        resolver,
        api_secret: api_secret.map(str::to_string),
    });
    TestServer::new(app(state)).unwrap()
}

fn server_for(upstream: &Upstream) -> TestServer {
    create_test_server(resolver_for(&format!("http://{}", upstream.addr)), None)
}

#[tokio::test]
async fn test_non_post_methods_rejected() {
    let server = create_test_server(resolver_for(UNREACHABLE), None);

    for response in [
        server.get("/api/roof-area").await,
        server.put("/api/roof-area").await,
        server.delete("/api/roof-area").await,
        server.patch("/api/roof-area").await,
    ] {
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        let json: Value = response.json();
        assert_eq!(json, json!({"error": "Only POST allowed"}));
    }
}

#[tokio::test]
async fn test_missing_address() {
    let server = create_test_server(resolver_for(UNREACHABLE), None);

    let response = server.post("/api/roof-area").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"], "Missing address in request body");

    let response = server
        .post("/api/roof-area")
        .json(&json!({"address": ""}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.post("/api/roof-area").text("not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_api_key() {
    let upstream = spawn_upstream(geocode_ok(37.422, -122.084), roof_ok(55.5, sample_polygon())).await;
    let base = format!("http://{}", upstream.addr);
    let resolver = RoofAreaResolver::builder()
        .geocode_url(format!("{}/maps/api/geocode/json", base))
        .roof_segments_url(format!("{}/v1/roofSegments", base))
        .build()
        .unwrap();
    let server = create_test_server(resolver, None);

    let response = server
        .post("/api/roof-area")
        .json(&json!({"address": ADDRESS}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("missing Google API key"));
    assert!(upstream.geocode_calls().is_empty());
}

#[tokio::test]
async fn test_geocode_no_results() {
    let geocode = (
        StatusCode::OK,
        json!({"results": [], "status": "ZERO_RESULTS"}).to_string(),
    );
    let upstream = spawn_upstream(geocode, roof_ok(55.5, sample_polygon())).await;
    let server = server_for(&upstream);

    let response = server
        .post("/api/roof-area")
        .json(&json!({"address": "nowhere at all"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"], "Geocode failed - address not found");
    assert_eq!(json["details"]["status"], "ZERO_RESULTS");
    assert!(upstream.roof_calls().is_empty());
}

#[tokio::test]
async fn test_roof_provider_failure() {
    let roof = (
        StatusCode::FORBIDDEN,
        "<html><body>Permission denied</body></html>".to_string(),
    );
    let upstream = spawn_upstream(geocode_ok(37.422, -122.084), roof).await;
    let server = server_for(&upstream);

    let response = server
        .post("/api/roof-area")
        .json(&json!({"address": ADDRESS}))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["error"], "Solar API request failed");
    assert_eq!(json["status"], 403);
    assert_eq!(json["details"], "<html><body>Permission denied</body></html>");
}

#[tokio::test]
async fn test_no_roof_segments() {
    let roof = (StatusCode::OK, json!({"roofSegments": []}).to_string());
    let upstream = spawn_upstream(geocode_ok(37.422, -122.084), roof).await;
    let server = server_for(&upstream);

    let response = server
        .post("/api/roof-area")
        .json(&json!({"address": ADDRESS}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json: Value = response.json();
    assert_eq!(
        json,
        json!({"error": "No roof found at this location (try larger radius)"})
    );
}

#[tokio::test]
async fn test_square_feet_conversion() {
    let upstream = spawn_upstream(geocode_ok(10.0, 20.0), roof_ok(100.0, json!([]))).await;
    let server = server_for(&upstream);

    let response = server
        .post("/api/roof-area")
        .json(&json!({"address": "1 Main St"}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["area_m2"], 100.0);
    assert_eq!(json["area_ft2"], 1076);
}

#[tokio::test]
async fn test_end_to_end() {
    let upstream =
        spawn_upstream(geocode_ok(37.422, -122.084), roof_ok(55.5, sample_polygon())).await;
    let server = server_for(&upstream);

    let response = server
        .post("/api/roof-area")
        .json(&json!({"address": ADDRESS}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(
        json,
        json!({
            "address": ADDRESS,
            "lat": 37.422,
            "lng": -122.084,
            "area_m2": 55.5,
            "area_ft2": 597,
            "polygon": sample_polygon(),
        })
    );

    let geocode_calls = upstream.geocode_calls();
    assert_eq!(geocode_calls.len(), 1);
    assert_eq!(geocode_calls[0]["address"], ADDRESS);
    assert_eq!(geocode_calls[0]["key"], TEST_KEY);

    let roof_calls = upstream.roof_calls();
    assert_eq!(roof_calls.len(), 1);
    assert_eq!(roof_calls[0]["location"], "37.422,-122.084");
    assert_eq!(roof_calls[0]["radiusMeters"], "30");
    assert_eq!(roof_calls[0]["key"], TEST_KEY);
}

#[tokio::test]
async fn test_repeated_request_is_identical() {
    let upstream =
        spawn_upstream(geocode_ok(37.422, -122.084), roof_ok(55.5, sample_polygon())).await;
    let server = server_for(&upstream);

    let first = server
        .post("/api/roof-area")
        .json(&json!({"address": ADDRESS}))
        .await
        .text();
    let second = server
        .post("/api/roof-area")
        .json(&json!({"address": ADDRESS}))
        .await
        .text();

    assert_eq!(first, second);
    assert_eq!(upstream.geocode_calls().len(), 2);
}

#[tokio::test]
async fn test_geocode_malformed_json() {
    let geocode = (StatusCode::OK, "<html>oops</html>".to_string());
    let upstream = spawn_upstream(geocode, roof_ok(55.5, sample_polygon())).await;
    let server = server_for(&upstream);

    let response = server
        .post("/api/roof-area")
        .json(&json!({"address": ADDRESS}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["error"], "Unexpected server error");
    assert!(json["details"].is_string());
}

#[tokio::test]
async fn test_unreachable_upstream_does_not_leak_key() {
    let server = create_test_server(resolver_for(UNREACHABLE), None);

    let response = server
        .post("/api/roof-area")
        .json(&json!({"address": ADDRESS}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["error"], "Unexpected server error");
    assert!(!response.text().contains(TEST_KEY));
}

#[tokio::test]
async fn test_secret_header() {
    let upstream =
        spawn_upstream(geocode_ok(37.422, -122.084), roof_ok(55.5, sample_polygon())).await;
    let resolver = resolver_for(&format!("http://{}", upstream.addr));
    let server = create_test_server(resolver, Some("s3cret"));
    let header = HeaderName::from_static("x-api-secret");

    let response = server
        .post("/api/roof-area")
        .json(&json!({"address": ADDRESS}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let json: Value = response.json();
    assert_eq!(json["error"], "Invalid secret header");

    let response = server
        .post("/api/roof-area")
        .add_header(header.clone(), HeaderValue::from_static("wrong"))
        .json(&json!({"address": ADDRESS}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(upstream.geocode_calls().is_empty());

    let response = server
        .post("/api/roof-area")
        .add_header(header, HeaderValue::from_static("s3cret"))
        .json(&json!({"address": ADDRESS}))
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["area_ft2"], 597);

    // Method check comes before the secret check
    let response = server.get("/api/roof-area").await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server(resolver_for(UNREACHABLE), None);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].as_str().is_some());
}

#[tokio::test]
async fn test_openapi_document() {
    let server = create_test_server(resolver_for(UNREACHABLE), None);

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["paths"]["/api/roof-area"]["post"].is_object());
    assert!(json["paths"]["/health"]["get"].is_object());
}
