//! Address geocoding.
//!
//! Sends a free-form address to a Google-compatible geocoding endpoint and
//! takes the location of the first result.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, RoofAreaError};
use crate::model::Coordinate;

/// Default geocoding endpoint.
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: Coordinate,
}

/// Geocode `address` against the endpoint at `url`.
///
/// The geocoder's HTTP status is not inspected: providers such as Google
/// report failures inside a 200 body with an empty `results` list, which
/// surfaces here as [`RoofAreaError::AddressNotFound`].
///
/// # Errors
///
/// - [`RoofAreaError::AddressNotFound`] if the response has no results
/// - [`RoofAreaError::Http`] on transport failure
/// - [`RoofAreaError::Parse`] if the body is not JSON or the first result
///   has no `geometry.location`
pub async fn geocode(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    address: &str,
) -> Result<Coordinate> {
    let text = client
        .get(url)
        .query(&[("address", address), ("key", api_key)])
        .send()
        .await?
        .text()
        .await?;

    let body: Value = serde_json::from_str(&text)?;
    parse_geocode_response(body)
}

/// Extract the first result's location from a geocoder response.
pub fn parse_geocode_response(body: Value) -> Result<Coordinate> {
    let first = body
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .cloned();

    let Some(first) = first else {
        return Err(RoofAreaError::AddressNotFound { details: body });
    };

    let result: GeocodeResult = serde_json::from_value(first)?;
    Ok(result.geometry.location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_first_result() {
        let body = json!({
            "results": [
                {"geometry": {"location": {"lat": 37.422, "lng": -122.084}}},
                {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}
            ],
            "status": "OK"
        });
        let location = parse_geocode_response(body).unwrap();
        assert_eq!(location, Coordinate::new(37.422, -122.084));
    }

    #[test]
    fn test_parse_empty_results() {
        let body = json!({"results": [], "status": "ZERO_RESULTS"});
        match parse_geocode_response(body) {
            Err(RoofAreaError::AddressNotFound { details }) => {
                assert_eq!(details["status"], "ZERO_RESULTS");
            }
            other => panic!("expected AddressNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_results() {
        let body = json!({"error_message": "The provided API key is invalid.", "status": "REQUEST_DENIED"});
        assert!(matches!(
            parse_geocode_response(body),
            Err(RoofAreaError::AddressNotFound { .. })
        ));
    }

    #[test]
    fn test_parse_result_without_location() {
        let body = json!({"results": [{"formatted_address": "somewhere"}]});
        assert!(matches!(
            parse_geocode_response(body),
            Err(RoofAreaError::Parse(_))
        ));
    }
}
