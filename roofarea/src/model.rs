//! Request-scoped values passed between the resolver stages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Square feet in one square meter.
pub const SQUARE_FEET_PER_SQUARE_METER: f64 = 10.7639;

/// Convert an area in square meters to whole square feet.
///
/// The result is rounded to the nearest integer.
///
/// # Example
///
/// ```
/// use roofarea::square_meters_to_square_feet;
///
/// assert_eq!(square_meters_to_square_feet(100.0), 1076);
/// ```
pub fn square_meters_to_square_feet(area_m2: f64) -> i64 {
    (area_m2 * SQUARE_FEET_PER_SQUARE_METER).round() as i64
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A rooftop region reported by the roof data provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoofSegment {
    /// Estimated segment area in square meters.
    #[serde(rename = "areaMeters2")]
    pub area_meters2: f64,
    /// Outline of the segment, passed through as sent by the provider.
    #[serde(default)]
    pub polygon: Value,
}

/// Result of resolving an address to its nearest roof segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofAreaReport {
    /// The address exactly as supplied by the caller.
    pub address: String,
    /// Latitude of the geocoded address.
    pub lat: f64,
    /// Longitude of the geocoded address.
    pub lng: f64,
    /// Roof segment area in square meters.
    pub area_m2: f64,
    /// Roof segment area in square feet, rounded.
    pub area_ft2: i64,
    /// Roof segment outline.
    pub polygon: Value,
}

impl RoofAreaReport {
    /// Build a report from the outputs of the geocode and roof lookup stages.
    pub fn new(address: impl Into<String>, location: Coordinate, segment: RoofSegment) -> Self {
        Self {
            address: address.into(),
            lat: location.lat,
            lng: location.lng,
            area_m2: segment.area_meters2,
            area_ft2: square_meters_to_square_feet(segment.area_meters2),
            polygon: segment.polygon,
        }
    }

    /// The geocoded location of the report.
    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}
