//! Roof segment lookup against a solar data provider.

use serde_json::Value;

use crate::error::{Result, RoofAreaError};
use crate::model::{Coordinate, RoofSegment};

/// Default roof segment endpoint.
pub const DEFAULT_ROOF_SEGMENTS_URL: &str = "https://solar.googleapis.com/v1/roofSegments";

/// Search radius around the geocoded point, in meters.
pub const DEFAULT_RADIUS_METERS: u32 = 30;

/// Fetch the roof segment nearest to `location`.
///
/// # Errors
///
/// - [`RoofAreaError::UpstreamFailure`] if the provider answers with a
///   non-success status; the body is kept as raw text since error pages are
///   often HTML
/// - [`RoofAreaError::NoRoofSegment`] if the response lists no segments
/// - [`RoofAreaError::Http`] on transport failure
/// - [`RoofAreaError::Parse`] if the body is not JSON or the first segment
///   has no area
pub async fn nearest_roof_segment(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    location: Coordinate,
    radius_meters: u32,
) -> Result<RoofSegment> {
    let response = client
        .get(url)
        .query(&[
            ("location", format!("{},{}", location.lat, location.lng)),
            ("radiusMeters", radius_meters.to_string()),
            ("key", api_key.to_string()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        tracing::warn!(status = status.as_u16(), body = %body, "Roof segment lookup failed");
        return Err(RoofAreaError::UpstreamFailure {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await?;
    let body: Value = serde_json::from_str(&text)?;
    parse_roof_segments_response(body)
}

/// Extract the first roof segment from a provider response.
///
/// Later segments are ignored without being validated.
pub fn parse_roof_segments_response(body: Value) -> Result<RoofSegment> {
    let first = body
        .get("roofSegments")
        .and_then(Value::as_array)
        .and_then(|segments| segments.first())
        .cloned()
        .ok_or(RoofAreaError::NoRoofSegment)?;

    Ok(serde_json::from_value(first)?)
}
