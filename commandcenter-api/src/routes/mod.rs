//! REST API Routes Module
//!
//! Route handlers, one module per endpoint:
//! - `GET /api/clients` - list clients with filters
//! - `GET /api/contacts` - list contactable contacts
//! - `GET|POST /api/interactions` - list and log interactions
//! - `PATCH /api/clientUpdateCategory/:id` - change a client's category
//! - `GET /api/health` - record store connectivity check
//! - `GET|POST /api/overdueDigest` - run the overdue digest
//!
//! Every endpoint answers `OPTIONS` with its allowed methods, sets
//! `Access-Control-Allow-Origin: *`, and answers other methods with 405.

pub mod client_category;
pub mod clients;
pub mod contacts;
pub mod digest;
pub mod health;
pub mod interactions;

use axum::{
    body::Bytes,
    http::{header, Method},
    response::IntoResponse,
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub use client_category::create_router as client_category_router;
pub use clients::create_router as clients_router;
pub use contacts::create_router as contacts_router;
pub use digest::create_router as digest_router;
pub use health::create_router as health_router;
pub use interactions::create_router as interactions_router;

// ============================================================================
// SHARED HANDLER PIECES
// ============================================================================

/// CORS layer for one endpoint.
///
/// Any origin, `Content-Type` as the only request header, and the endpoint's
/// own methods plus `OPTIONS`. Preflight (`OPTIONS`) requests are answered
/// by the layer with 200 and never reach a handler.
pub fn endpoint_cors(methods: &[Method]) -> CorsLayer {
    let mut allowed: Vec<Method> = methods.to_vec();
    if !allowed.contains(&Method::OPTIONS) {
        allowed.push(Method::OPTIONS);
    }

    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods(allowed)
}

/// Fallback for methods an endpoint does not accept.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Unmatched paths sit outside every endpoint's CORS layer, so the origin
/// header is set here.
async fn route_not_found() -> impl IntoResponse {
    (
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        ApiError::not_found(),
    )
}

/// Decode a JSON request body.
///
/// An empty body is `Request body is required`; anything that does not
/// match `T` is `Invalid request data` with details.
pub fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::missing_body());
    }
    Ok(serde_json::from_slice(body)?)
}

/// Treat empty and whitespace-only query values as absent.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
pub fn create_api_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(clients_router(state.clone()))
        .merge(contacts_router(state.clone()))
        .merge(interactions_router(state.clone()))
        .merge(client_category_router(state.clone()))
        .merge(health_router(state.clone()))
        .merge(digest_router(state));

    Router::new()
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
}
