//! Health Check Route
//!
//! `GET /api/health` reads at most one client record to prove the store is
//! reachable with the configured credentials.

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use commandcenter_airtable::ListParams;
use commandcenter_core::{table, Timestamp};
use serde::{Deserialize, Serialize};

use super::{endpoint_cors, method_not_allowed};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airtable_connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Response {
    let timestamp = Utc::now();
    let params = ListParams::new().max_records(1);

    match state.store.list(table::CLIENTS, &params).await {
        Ok(page) => Json(HealthResponse {
            status: HealthStatus::Ok,
            timestamp,
            airtable_connection: Some("connected".to_string()),
            record_count: Some(page.records.len()),
            error: None,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: HealthStatus::Error,
                    timestamp,
                    airtable_connection: None,
                    record_count: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check).fallback(method_not_allowed))
        .layer(endpoint_cors(&[Method::GET]))
        .with_state(state)
}
