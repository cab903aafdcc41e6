//! Roof Area Service Library
//!
//! HTTP handlers, router and types for the roof area service.
//! This library is used by both the roofarea-service binary and integration tests.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use roofarea::RoofAreaResolver;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers.
pub struct AppState {
    /// Resolver holding the provider configuration.
    pub resolver: RoofAreaResolver,
    /// Shared secret required in `x-api-secret`, if enabled.
    pub api_secret: Option<String>,
}

/// OpenAPI documentation for the roof area service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roof Area Service",
        version = "0.1.0",
        description = "Resolve a street address to the estimated area of its nearest roof segment.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(handlers::post_roof_area, handlers::health_check),
    components(schemas(
        handlers::RoofAreaRequest,
        handlers::RoofAreaResponse,
        handlers::ErrorResponse,
        handlers::HealthResponse,
    )),
    tags(
        (name = "roof", description = "Roof area endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the service router.
///
/// Only POST is routed to the roof area handler; every other method gets a
/// JSON 405 before the secret check runs.
pub fn app(state: Arc<AppState>) -> Router {
    let roof_area = post(handlers::post_roof_area)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_secret,
        ))
        .fallback(handlers::method_not_allowed);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/roof-area", roof_area)
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handlers::panic_response))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{ErrorResponse, HealthResponse, RoofAreaRequest, RoofAreaResponse};
