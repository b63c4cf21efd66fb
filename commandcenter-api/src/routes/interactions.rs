//! Interaction REST API Routes
//!
//! - `GET /api/interactions?contactId&clientId` - newest first
//! - `POST /api/interactions` - log an interaction against a contact
//!
//! A new interaction is linked to every client of its contact. A contact
//! without a linked client cannot receive interactions.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use commandcenter_airtable::{ListParams, SortSpec};
use commandcenter_core::{
    field, linked_client_ids, record_to_interaction, table, FieldReader, FormulaBuilder,
    Interaction, InteractionType, RecordId, Timestamp, ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{endpoint_cors, method_not_allowed, non_blank, parse_json_body};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const INTERACTIONS_MAX_RECORDS: u32 = 100;

pub const UNLINKED_CONTACT_MESSAGE: &str = "Contact must be linked to a client";

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionRequest {
    pub contact_id: RecordId,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateInteractionRequest {
    pub fn validate(&self) -> ApiResult<()> {
        if self.contact_id.trim().is_empty() {
            return Err(ApiError::invalid_field("contactId", "must not be empty"));
        }
        Ok(())
    }

    /// Notes to store, if any. Empty notes are dropped.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.is_empty())
    }

    /// Fields for the new record: `Contact`, `Client`, `Type`, and `Notes`
    /// only when non-empty.
    pub fn to_fields(&self, client_ids: &[RecordId]) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            field::CONTACT.to_string(),
            Value::from(vec![self.contact_id.clone()]),
        );
        fields.insert(field::CLIENT.to_string(), Value::from(client_ids.to_vec()));
        fields.insert(
            field::TYPE.to_string(),
            Value::from(self.interaction_type.as_db_str()),
        );
        if let Some(notes) = self.notes() {
            fields.insert(field::NOTES.to_string(), Value::from(notes));
        }
        fields
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionResponse {
    pub success: bool,
    pub interaction_id: RecordId,
    pub contact_id: RecordId,
    pub client_ids: Vec<RecordId>,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    /// Always present; `null` when no notes were given.
    pub notes: Option<String>,
    pub timestamp: Timestamp,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInteractionsQuery {
    pub contact_id: Option<String>,
    pub client_id: Option<String>,
}

impl ListInteractionsQuery {
    pub fn to_list_params(&self) -> ListParams {
        let formula = FormulaBuilder::new()
            .linked_to(field::CONTACT, non_blank(&self.contact_id))
            .linked_to(field::CLIENT, non_blank(&self.client_id))
            .build();

        ListParams::new()
            .filter(formula)
            .sort_by(SortSpec::desc(field::TIMESTAMP))
            .max_records(INTERACTIONS_MAX_RECORDS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListInteractionsResponse {
    pub interactions: Vec<Interaction>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// `Created <type> interaction for contact <name or id>`
pub fn interaction_summary(
    interaction_type: InteractionType,
    contact_name: Option<&str>,
    contact_id: &str,
) -> String {
    format!(
        "Created {} interaction for contact {}",
        interaction_type.as_db_str().to_lowercase(),
        contact_name.unwrap_or(contact_id)
    )
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/interactions
///
/// One contact read, then at most one create.
pub async fn create_interaction(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let req: CreateInteractionRequest = parse_json_body(&body)?;
    req.validate()?;

    let contact = state.store.get(table::CONTACTS, &req.contact_id).await?;
    let client_ids = linked_client_ids(&contact);
    if client_ids.is_empty() {
        tracing::info!(contact_id = %req.contact_id, "Rejected interaction for unlinked contact");
        return Err(ValidationError::business_rule(UNLINKED_CONTACT_MESSAGE).into());
    }

    let created = state
        .store
        .create(table::INTERACTIONS, req.to_fields(&client_ids))
        .await?;

    let contact_name = FieldReader::new(&contact).text(field::FULL_NAME);
    let summary = interaction_summary(
        req.interaction_type,
        contact_name.as_deref(),
        &req.contact_id,
    );
    tracing::info!(interaction_id = %created.id, %summary, "Interaction created");

    let response = CreateInteractionResponse {
        success: true,
        interaction_id: created.id,
        contact_id: req.contact_id.clone(),
        client_ids,
        interaction_type: req.interaction_type,
        notes: req.notes().map(String::from),
        timestamp: created.created_time,
        summary,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/interactions
pub async fn list_interactions(
    State(state): State<AppState>,
    Query(query): Query<ListInteractionsQuery>,
) -> ApiResult<Json<ListInteractionsResponse>> {
    let page = state
        .store
        .list(table::INTERACTIONS, &query.to_list_params())
        .await?;

    let mut interactions: Vec<Interaction> =
        page.records.iter().map(record_to_interaction).collect();
    // Store sort misses records whose Timestamp fell back to creation time.
    interactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(Json(ListInteractionsResponse {
        total: interactions.len(),
        interactions,
        offset: page.offset,
    }))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/interactions",
            get(list_interactions)
                .post(create_interaction)
                .fallback(method_not_allowed),
        )
        .layer(endpoint_cors(&[Method::GET, Method::POST]))
        .with_state(state)
}
