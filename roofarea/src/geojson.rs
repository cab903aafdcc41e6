//! GeoJSON export of roof area reports.
//!
//! Enable the `geojson` feature to use this module.
//!
//! Providers report roof outlines as `[lat, lng]` pairs, while GeoJSON
//! positions are `[longitude, latitude]`. The conversion swaps each pair and
//! closes the ring if the provider left it open.
//!
//! # Example
//!
//! ```ignore
//! use roofarea::geojson::report_to_feature;
//!
//! let report = resolver.resolve("1600 Amphitheatre Parkway, Mountain View, CA").await?;
//! let feature = report_to_feature(&report)?;
//! println!("{}", feature.to_string());
//! ```

use geojson::{Feature, Geometry, JsonObject, Value as GeoJsonValue};
use serde_json::Value;

use crate::error::{Result, RoofAreaError};
use crate::model::RoofAreaReport;

/// Convert a report into a GeoJSON Feature with a Polygon geometry.
///
/// The report's scalar fields become the feature's properties.
///
/// # Errors
///
/// Returns [`RoofAreaError::Parse`] if the polygon is not a list of at least
/// three `[lat, lng]` pairs.
pub fn report_to_feature(report: &RoofAreaReport) -> Result<Feature> {
    let ring = polygon_to_ring(&report.polygon)?;

    let mut properties = JsonObject::new();
    properties.insert("address".to_string(), Value::from(report.address.clone()));
    properties.insert("lat".to_string(), Value::from(report.lat));
    properties.insert("lng".to_string(), Value::from(report.lng));
    properties.insert("area_m2".to_string(), Value::from(report.area_m2));
    properties.insert("area_ft2".to_string(), Value::from(report.area_ft2));

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoJsonValue::Polygon(vec![ring]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Convert a provider polygon into a closed GeoJSON linear ring.
pub fn polygon_to_ring(polygon: &Value) -> Result<Vec<Vec<f64>>> {
    let points = polygon
        .as_array()
        .ok_or_else(|| RoofAreaError::Parse("roof polygon is not an array".to_string()))?;

    let mut ring = points
        .iter()
        .map(|point| match point.as_array().map(Vec::as_slice) {
            Some([lat, lng, ..]) => match (lat.as_f64(), lng.as_f64()) {
                (Some(lat), Some(lng)) => Ok(vec![lng, lat]),
                _ => Err(RoofAreaError::Parse(format!(
                    "non-numeric roof polygon point: {}",
                    point
                ))),
            },
            _ => Err(RoofAreaError::Parse(format!(
                "invalid roof polygon point: {}",
                point
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    if ring.len() < 3 {
        return Err(RoofAreaError::Parse(format!(
            "roof polygon has {} points, need at least 3",
            ring.len()
        )));
    }

    if ring.first() != ring.last() {
        ring.push(ring[0].clone());
    }

    Ok(ring)
}
