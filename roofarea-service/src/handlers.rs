//! HTTP request handlers for the roof area service.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roofarea::{RoofAreaError, RoofAreaReport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::AppState;

/// Roof area request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RoofAreaRequest {
    /// Free-form postal address, e.g. "123 Main St, City, State".
    #[serde(default)]
    pub address: Option<String>,
}

/// Successful roof area response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoofAreaResponse {
    /// Address as supplied in the request.
    pub address: String,
    /// Latitude of the geocoded address.
    pub lat: f64,
    /// Longitude of the geocoded address.
    pub lng: f64,
    /// Roof segment area in square meters.
    pub area_m2: f64,
    /// Roof segment area in square feet, rounded to the nearest integer.
    pub area_ft2: i64,
    /// Roof segment outline as reported by the provider.
    #[schema(value_type = Object)]
    pub polygon: Value,
}

impl From<RoofAreaReport> for RoofAreaResponse {
    fn from(report: RoofAreaReport) -> Self {
        Self {
            address: report.address,
            lat: report.lat,
            lng: report.lng,
            area_m2: report.area_m2,
            area_ft2: report.area_ft2,
            polygon: report.polygon,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Upstream HTTP status, set when a provider call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Diagnostic detail: raw upstream payload or fault message.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Resolve an address to the area of its nearest roof segment.
///
/// # Returns
///
/// - `200 OK` with the roof area on success
/// - `400 Bad Request` if the address is missing or cannot be geocoded
/// - `404 Not Found` if no roof segment is near the address
/// - `500 Internal Server Error` on misconfiguration or unexpected errors
/// - `502 Bad Gateway` if the roof data provider fails
#[utoipa::path(
    post,
    path = "/api/roof-area",
    tag = "roof",
    request_body = RoofAreaRequest,
    params(
        ("x-api-secret" = Option<String>, Header, description = "Shared secret, required when the service is configured with one")
    ),
    responses(
        (status = 200, description = "Roof area found", body = RoofAreaResponse),
        (status = 400, description = "Missing address or address not found", body = ErrorResponse),
        (status = 401, description = "Invalid secret header", body = ErrorResponse),
        (status = 404, description = "No roof segment near the address", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 500, description = "Misconfiguration or unexpected error", body = ErrorResponse),
        (status = 502, description = "Roof data provider failure", body = ErrorResponse)
    )
)]
pub async fn post_roof_area(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Some(address) = parse_address(&body) else {
        return error_response(RoofAreaError::MissingAddress);
    };

    tracing::debug!(address = %address, "Roof area query");

    match state.resolver.resolve(&address).await {
        Ok(report) => (StatusCode::OK, Json(RoofAreaResponse::from(report))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Extract a non-empty `address` from a JSON request body.
///
/// Bodies that are not JSON objects are treated the same as a missing field.
fn parse_address(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<RoofAreaRequest>(body)
        .ok()
        .and_then(|request| request.address)
        .filter(|address| !address.trim().is_empty())
}

/// Fallback for every method other than POST on the roof area route.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Only POST allowed")),
    )
        .into_response()
}

/// Map a resolver error to its HTTP status and JSON body.
pub fn error_response(e: RoofAreaError) -> Response {
    let message = e.to_string();

    let (status, body) = match e {
        RoofAreaError::MissingAddress => (StatusCode::BAD_REQUEST, ErrorResponse::new(message)),
        RoofAreaError::MissingApiKey => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(message),
        ),
        RoofAreaError::AddressNotFound { details } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(message).with_details(details),
        ),
        RoofAreaError::UpstreamFailure { status, body } => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse {
                error: "Solar API request failed".to_string(),
                status: Some(status),
                details: Some(Value::String(body)),
            },
        ),
        RoofAreaError::NoRoofSegment => (StatusCode::NOT_FOUND, ErrorResponse::new(message)),
        RoofAreaError::Http(_) | RoofAreaError::Parse(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Unexpected server error").with_details(Value::String(message)),
        ),
    };

    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error = %body.error, "Roof area query failed");
    } else {
        tracing::warn!(status = status.as_u16(), error = %body.error, "Roof area query failed");
    }

    (status, Json(body)).into_response()
}

/// Convert a handler panic into the generic server error body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(details = %details, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Unexpected server error").with_details(Value::String(details))),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
