//! Address to roof area pipeline.

use std::time::Duration;

use crate::error::{Result, RoofAreaError};
use crate::geocode::{self, DEFAULT_GEOCODE_URL};
use crate::model::{Coordinate, RoofAreaReport, RoofSegment};
use crate::roof::{self, DEFAULT_RADIUS_METERS, DEFAULT_ROOF_SEGMENTS_URL};

/// Default timeout for each upstream request in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolves addresses to the area of the nearest roof segment.
///
/// Holds only read-only configuration and a pooled HTTP client, so a single
/// instance can be shared across concurrent requests.
///
/// # Example
///
/// ```ignore
/// use roofarea::RoofAreaResolver;
///
/// let resolver = RoofAreaResolver::builder().api_key("...").build()?;
/// let report = resolver.resolve("1600 Amphitheatre Parkway, Mountain View, CA").await?;
/// println!("{} ft²", report.area_ft2);
/// ```
#[derive(Clone)]
pub struct RoofAreaResolver {
    client: reqwest::Client,
    api_key: Option<String>,
    geocode_url: String,
    roof_segments_url: String,
    radius_meters: u32,
}

impl RoofAreaResolver {
    /// Create a builder with default endpoints and no API key.
    pub fn builder() -> RoofAreaResolverBuilder {
        RoofAreaResolverBuilder::new()
    }

    /// Run the full pipeline: validate, geocode, look up the roof, convert.
    ///
    /// # Errors
    ///
    /// - [`RoofAreaError::MissingAddress`] if `address` is empty or blank
    /// - [`RoofAreaError::MissingApiKey`] if no API key is configured
    /// - any error from [`geocode`](Self::geocode) or
    ///   [`nearest_roof_segment`](Self::nearest_roof_segment)
    pub async fn resolve(&self, address: &str) -> Result<RoofAreaReport> {
        if address.trim().is_empty() {
            return Err(RoofAreaError::MissingAddress);
        }
        // Checked up front so a missing key fails before any network call.
        self.api_key()?;

        let location = self.geocode(address).await?;
        let segment = self.nearest_roof_segment(location).await?;
        let report = RoofAreaReport::new(address, location, segment);

        tracing::info!(
            lat = report.lat,
            lng = report.lng,
            area_m2 = report.area_m2,
            area_ft2 = report.area_ft2,
            "Roof area resolved"
        );

        Ok(report)
    }

    /// Resolve `address` to coordinates using the first geocoder result.
    pub async fn geocode(&self, address: &str) -> Result<Coordinate> {
        let api_key = self.api_key()?;
        let location = geocode::geocode(&self.client, &self.geocode_url, api_key, address).await?;
        tracing::debug!(lat = location.lat, lng = location.lng, "Address geocoded");
        Ok(location)
    }

    /// Fetch the first roof segment within the search radius of `location`.
    pub async fn nearest_roof_segment(&self, location: Coordinate) -> Result<RoofSegment> {
        let api_key = self.api_key()?;
        let segment = roof::nearest_roof_segment(
            &self.client,
            &self.roof_segments_url,
            api_key,
            location,
            self.radius_meters,
        )
        .await?;
        tracing::debug!(area_m2 = segment.area_meters2, "Roof segment found");
        Ok(segment)
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Geocoding endpoint in use.
    pub fn geocode_url(&self) -> &str {
        &self.geocode_url
    }

    /// Roof segment endpoint in use.
    pub fn roof_segments_url(&self) -> &str {
        &self.roof_segments_url
    }

    /// Search radius in meters.
    pub fn radius_meters(&self) -> u32 {
        self.radius_meters
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            tracing::error!("GOOGLE_API_KEY is not configured");
            RoofAreaError::MissingApiKey
        })
    }
}

/// Builder for [`RoofAreaResolver`].
///
/// # Example
///
/// ```ignore
/// use roofarea::RoofAreaResolverBuilder;
///
/// let resolver = RoofAreaResolverBuilder::new()
///     .api_key("...")
///     .timeout_secs(10)
///     .build()?;
/// ```
#[derive(Clone)]
pub struct RoofAreaResolverBuilder {
    api_key: Option<String>,
    geocode_url: String,
    roof_segments_url: String,
    radius_meters: u32,
    timeout_secs: u64,
}

impl Default for RoofAreaResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RoofAreaResolverBuilder {
    /// Create a builder pointed at the Google endpoints, without an API key.
    pub fn new() -> Self {
        Self {
            api_key: None,
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            roof_segments_url: DEFAULT_ROOF_SEGMENTS_URL.to_string(),
            radius_meters: DEFAULT_RADIUS_METERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `GOOGLE_API_KEY` | API key for both providers | None |
    /// | `ROOFAREA_GEOCODE_URL` | Geocoding endpoint | Google Geocoding API |
    /// | `ROOFAREA_ROOF_SEGMENTS_URL` | Roof segment endpoint | Google Solar API |
    /// | `ROOFAREA_TIMEOUT_SECS` | Per-request timeout | 30 |
    ///
    /// A missing `GOOGLE_API_KEY` is not an error here. The resolver reports
    /// [`RoofAreaError::MissingApiKey`] on each call instead.
    pub fn from_env() -> Self {
        let mut builder = Self::new();

        if let Some(key) = non_empty_var("GOOGLE_API_KEY") {
            builder.api_key = Some(key);
        }
        if let Some(url) = non_empty_var("ROOFAREA_GEOCODE_URL") {
            builder.geocode_url = url;
        }
        if let Some(url) = non_empty_var("ROOFAREA_ROOF_SEGMENTS_URL") {
            builder.roof_segments_url = url;
        }
        if let Some(secs) = non_empty_var("ROOFAREA_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            builder.timeout_secs = secs;
        }

        builder
    }

    /// Set the provider API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the geocoding endpoint.
    pub fn geocode_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_url = url.into();
        self
    }

    /// Set the roof segment endpoint.
    pub fn roof_segments_url(mut self, url: impl Into<String>) -> Self {
        self.roof_segments_url = url.into();
        self
    }

    /// Set the roof search radius in meters.
    ///
    /// Default is 30 meters.
    pub fn radius_meters(mut self, radius: u32) -> Self {
        self.radius_meters = radius;
        self
    }

    /// Set the timeout applied to each upstream request.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Build the [`RoofAreaResolver`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created (e.g., due to
    /// TLS initialization failure).
    pub fn build(self) -> Result<RoofAreaResolver> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;

        Ok(RoofAreaResolver {
            client,
            api_key: self.api_key,
            geocode_url: self.geocode_url,
            roof_segments_url: self.roof_segments_url,
            radius_meters: self.radius_meters,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
