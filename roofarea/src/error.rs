//! Error types for the roofarea library.

use thiserror::Error;

/// Errors that can occur while resolving an address to a roof area.
#[derive(Error, Debug)]
pub enum RoofAreaError {
    /// The caller did not supply an address.
    #[error("Missing address in request body")]
    MissingAddress,

    /// No provider API key is configured.
    #[error("Server misconfiguration - missing Google API key")]
    MissingApiKey,

    /// The geocoder returned no results for the address.
    #[error("Geocode failed - address not found")]
    AddressNotFound {
        /// Raw geocoder response, kept for diagnosis.
        details: serde_json::Value,
    },

    /// The roof data provider answered with a non-success status.
    #[error("Solar API request failed with status {status}")]
    UpstreamFailure { status: u16, body: String },

    /// The roof data provider found no roof segment near the coordinates.
    #[error("No roof found at this location (try larger radius)")]
    NoRoofSegment,

    /// Transport failure talking to an upstream provider.
    ///
    /// The request URL is stripped before the error is stored, since it
    /// carries the API key as a query parameter.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// An upstream response did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RoofAreaError {
    fn from(e: reqwest::Error) -> Self {
        RoofAreaError::Http(e.without_url())
    }
}

impl From<serde_json::Error> for RoofAreaError {
    fn from(e: serde_json::Error) -> Self {
        RoofAreaError::Parse(e.to_string())
    }
}

/// Result type alias using [`RoofAreaError`].
pub type Result<T> = std::result::Result<T, RoofAreaError>;
