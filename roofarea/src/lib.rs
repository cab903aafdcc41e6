//! # roofarea - Address to Roof Area
//!
//! Resolves a postal address to the estimated area of its nearest roof
//! segment, using a geocoding provider and a solar roof data provider.
//!
//! ## Pipeline
//!
//! 1. **Geocode**: the address is sent to the geocoding API and the first
//!    result's latitude/longitude is kept.
//! 2. **Roof lookup**: the coordinates are sent to the roof segment API with a
//!    30 m search radius and the first segment is kept.
//! 3. **Convert**: the segment area is reported in square meters and in
//!    square feet (`round(m² × 10.7639)`).
//!
//! Each stage short-circuits with a [`RoofAreaError`]. Nothing is cached and
//! nothing is retried.
//!
//! ## Quick Start
//!
//! ```ignore
//! use roofarea::RoofAreaResolverBuilder;
//!
//! let resolver = RoofAreaResolverBuilder::from_env().build()?;
//! let report = resolver.resolve("1600 Amphitheatre Parkway, Mountain View, CA").await?;
//! println!("{} m² ({} ft²)", report.area_m2, report.area_ft2);
//! ```

pub mod error;
pub mod geocode;
pub mod model;
pub mod resolver;
pub mod roof;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use error::{Result, RoofAreaError};
pub use model::{
    square_meters_to_square_feet, Coordinate, RoofAreaReport, RoofSegment,
    SQUARE_FEET_PER_SQUARE_METER,
};
pub use resolver::{RoofAreaResolver, RoofAreaResolverBuilder, DEFAULT_TIMEOUT_SECS};
pub use roof::DEFAULT_RADIUS_METERS;
