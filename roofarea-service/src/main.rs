//! Roof Area Service - HTTP microservice resolving addresses to roof areas.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GOOGLE_API_KEY` | API key for the geocoding and solar providers | Required per request |
//! | `ROOFAREA_GEOCODE_URL` | Geocoding endpoint | Google Geocoding API |
//! | `ROOFAREA_ROOF_SEGMENTS_URL` | Roof segment endpoint | Google Solar API |
//! | `ROOFAREA_TIMEOUT_SECS` | Per-request upstream timeout | 30 |
//! | `ROOFAREA_API_SECRET` | Require this value in the `x-api-secret` header | None (disabled) |
//! | `ROOFAREA_PORT` | HTTP server port | 8080 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `POST /api/roof-area` - Resolve `{"address": "..."}` to a roof area
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use roofarea::RoofAreaResolverBuilder;
use roofarea_service::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roofarea_service=info,roofarea=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("ROOFAREA_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let api_secret = std::env::var("ROOFAREA_API_SECRET")
        .ok()
        .filter(|s| !s.is_empty());

    // A missing GOOGLE_API_KEY is reported per request, not at startup
    let resolver = RoofAreaResolverBuilder::from_env().build()?;

    if !resolver.has_api_key() {
        tracing::warn!("GOOGLE_API_KEY not set, roof area requests will fail with 500");
    }

    tracing::info!(
        geocode_url = resolver.geocode_url(),
        roof_segments_url = resolver.roof_segments_url(),
        radius_meters = resolver.radius_meters(),
        secret_header = api_secret.is_some(),
        port = port,
        "Starting roof area service"
    );

    let state = Arc::new(AppState {
        resolver,
        api_secret,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
