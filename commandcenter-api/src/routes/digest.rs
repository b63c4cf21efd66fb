//! Overdue Digest Route
//!
//! `GET|POST /api/overdueDigest` runs the digest on demand, the same run the
//! background job performs on its schedule.

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use commandcenter_core::{DigestSummary, Timestamp};
use serde::{Deserialize, Serialize};

use super::{endpoint_cors, method_not_allowed};
use crate::jobs::run_overdue_digest;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestResponse {
    pub success: bool,
    pub timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<DigestSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET|POST /api/overdueDigest
pub async fn trigger_digest(State(state): State<AppState>) -> Response {
    match run_overdue_digest(state.store.as_ref(), state.digest_max_records).await {
        Ok(report) => Json(DigestResponse {
            success: true,
            timestamp: report.generated_at,
            message: Some(report.message()),
            summary: Some(report.summary),
            error: None,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error in overdue digest");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DigestResponse {
                    success: false,
                    timestamp: Utc::now(),
                    summary: None,
                    message: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/overdueDigest",
            get(trigger_digest)
                .post(trigger_digest)
                .fallback(method_not_allowed),
        )
        .layer(endpoint_cors(&[Method::GET, Method::POST]))
        .with_state(state)
}
