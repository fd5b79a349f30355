//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET     /                - Greeting
//! GET     /health          - Liveness check
//! GET     /health/ready    - Readiness check (pings the store)
//!
//! # Catalog
//! GET     /api/products    - List products
//! POST    /api/products    - Insert a raw product document
//!
//! # Orders
//! POST    /api/orders      - Create an order
//!
//! # Inventory
//! GET     /api/skus        - SKUs for the configured product name
//! POST    /api/skus        - Insert a SKU
//! ```
//!
//! Every route except the health checks carries the CORS policy, and
//! `OPTIONS` on any of them answers 200 with no body.

pub mod health;
pub mod home;
pub mod orders;
pub mod products;
pub mod skus;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{cors_middleware, request_id_middleware};
use crate::state::AppState;

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::create))
        .route("/orders", post(orders::create))
        .route("/skus", get(skus::index).post(skus::create))
}

/// Create all CORS-governed routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/api", api_routes())
        .route_layer(middleware::from_fn(cors_middleware))
}

/// Build the complete application: routes, health checks, request ids and
/// request tracing, bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
