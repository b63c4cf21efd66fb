//! Contact REST API Routes
//!
//! `GET /api/contacts?clientId&owner&search`. Do-not-contact contacts are
//! always excluded.

use axum::{
    extract::{Query, State},
    http::Method,
    routing::get,
    Json, Router,
};
use commandcenter_airtable::{ListParams, SortSpec};
use commandcenter_core::{field, record_to_contact, table, Contact, FormulaBuilder, SearchTarget};
use serde::{Deserialize, Serialize};

use super::{endpoint_cors, method_not_allowed, non_blank};
use crate::error::ApiResult;
use crate::state::AppState;

pub const CONTACTS_MAX_RECORDS: u32 = 200;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsQuery {
    pub client_id: Option<String>,
    pub owner: Option<String>,
    pub search: Option<String>,
}

impl ListContactsQuery {
    pub fn to_list_params(&self) -> ListParams {
        let formula = FormulaBuilder::new()
            .exclude_do_not_contact()
            .linked_to(field::LINKED_CLIENT, non_blank(&self.client_id))
            .owner(non_blank(&self.owner))
            .search(non_blank(&self.search), SearchTarget::Contacts)
            .build();

        ListParams::new()
            .filter(formula)
            .sort_by(SortSpec::asc(field::FULL_NAME))
            .max_records(CONTACTS_MAX_RECORDS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListContactsResponse {
    pub contacts: Vec<Contact>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// GET /api/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ListContactsQuery>,
) -> ApiResult<Json<ListContactsResponse>> {
    let page = state
        .store
        .list(table::CONTACTS, &query.to_list_params())
        .await?;

    let contacts: Vec<Contact> = page.records.iter().map(record_to_contact).collect();

    Ok(Json(ListContactsResponse {
        total: contacts.len(),
        contacts,
        offset: page.offset,
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/contacts", get(list_contacts).fallback(method_not_allowed))
        .layer(endpoint_cors(&[Method::GET]))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_params_always_exclude_do_not_contact() {
        let params = ListContactsQuery::default().to_list_params();
        assert_eq!(params.filter_by_formula.as_deref(), Some("{Do Not Contact} != 1"));
        assert_eq!(params.sort, vec![SortSpec::asc("Full Name")]);
        assert_eq!(params.max_records, Some(200));
    }

    #[test]
    fn test_contact_params_with_client() {
        let query = ListContactsQuery {
            client_id: Some("recA".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.to_list_params().filter_by_formula.as_deref(),
            Some(concat!(
                "AND({Do Not Contact} != 1, ",
                "FIND(\"recA\", ARRAYJOIN({Linked Client}, \",\")) > 0)"
            ))
        );
    }
}
