//! Client Category Update Route
//!
//! `PATCH /api/clientUpdateCategory/:id` with body `{"category": "..."}`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::Method,
    routing::patch,
    Json, Router,
};
use commandcenter_core::{field, table, ClientCategory, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{endpoint_cors, method_not_allowed, parse_json_body};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const CLIENT_ID_REQUIRED: &str = "Client ID is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub category: ClientCategory,
}

impl UpdateCategoryRequest {
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            field::CATEGORY.to_string(),
            Value::from(self.category.as_db_str()),
        );
        fields
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryResponse {
    pub success: bool,
    pub client_id: RecordId,
    pub category: ClientCategory,
    /// Creation time of the updated record, as reported by the store.
    pub updated_at: Timestamp,
}

/// PATCH /api/clientUpdateCategory/:id
///
/// The body is validated before the store is contacted.
pub async fn update_client_category(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<UpdateCategoryResponse>> {
    if client_id.trim().is_empty() {
        return Err(ApiError::missing_field(CLIENT_ID_REQUIRED));
    }
    let req: UpdateCategoryRequest = parse_json_body(&body)?;

    let updated = state
        .store
        .update(table::CLIENTS, &client_id, req.to_fields())
        .await?;

    tracing::info!(
        client_id = %updated.id,
        category = %req.category.as_db_str(),
        "Client category updated"
    );

    Ok(Json(UpdateCategoryResponse {
        success: true,
        client_id: updated.id,
        category: req.category,
        updated_at: updated.created_time,
    }))
}

/// PATCH /api/clientUpdateCategory
async fn missing_client_id() -> ApiError {
    ApiError::missing_field(CLIENT_ID_REQUIRED)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/clientUpdateCategory/:id",
            patch(update_client_category).fallback(method_not_allowed),
        )
        .route(
            "/clientUpdateCategory",
            patch(missing_client_id).fallback(method_not_allowed),
        )
        .layer(endpoint_cors(&[Method::PATCH]))
        .with_state(state)
}
