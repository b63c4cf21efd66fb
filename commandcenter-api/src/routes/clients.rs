//! Client REST API Routes
//!
//! `GET /api/clients?overdue&category&owner&search`

use axum::{
    extract::{Query, State},
    http::Method,
    routing::get,
    Json, Router,
};
use commandcenter_airtable::{ListParams, SortSpec};
use commandcenter_core::{
    field, record_to_client, sort_by_severity, table, Client, ClientCategory, FormulaBuilder,
    SearchTarget,
};
use serde::{Deserialize, Serialize};

use super::{endpoint_cors, method_not_allowed, non_blank};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const CLIENTS_MAX_RECORDS: u32 = 100;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListClientsQuery {
    pub overdue: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
    pub search: Option<String>,
}

impl ListClientsQuery {
    /// Only the literal `true` enables the overdue filter.
    pub fn overdue_only(&self) -> bool {
        self.overdue.as_deref() == Some("true")
    }

    pub fn category(&self) -> ApiResult<Option<ClientCategory>> {
        non_blank(&self.category)
            .map(|raw| {
                raw.parse::<ClientCategory>()
                    .map_err(|e| ApiError::invalid_field("category", e))
            })
            .transpose()
    }

    /// Store list parameters for this query.
    pub fn to_list_params(&self) -> ApiResult<ListParams> {
        let overdue = self.overdue_only();
        let formula = FormulaBuilder::new()
            .overdue(overdue)
            .category(self.category()?)
            .owner(non_blank(&self.owner))
            .search(non_blank(&self.search), SearchTarget::Clients)
            .build();

        let params = ListParams::new()
            .filter(formula)
            .max_records(CLIENTS_MAX_RECORDS);

        Ok(if overdue {
            params
                .sort_by(SortSpec::desc(field::ALERT_LEVEL))
                .sort_by(SortSpec::desc(field::DAYS_SINCE_LAST_OUTREACH))
        } else {
            params.sort_by(SortSpec::asc(field::CLIENT_NAME))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListClientsResponse {
    pub clients: Vec<Client>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/clients
///
/// With `overdue=true` the result is re-sorted locally by severity rank,
/// then days since last outreach, both descending. The store sorts select
/// fields by option order, which is not guaranteed to match severity.
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> ApiResult<Json<ListClientsResponse>> {
    let params = query.to_list_params()?;
    let page = state.store.list(table::CLIENTS, &params).await?;

    let mut clients: Vec<Client> = page.records.iter().map(record_to_client).collect();
    if query.overdue_only() {
        sort_by_severity(&mut clients);
    }

    tracing::debug!(count = clients.len(), overdue = query.overdue_only(), "Listed clients");

    Ok(Json(ListClientsResponse {
        total: clients.len(),
        clients,
        offset: page.offset,
    }))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/clients", get(list_clients).fallback(method_not_allowed))
        .layer(endpoint_cors(&[Method::GET]))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(overdue: Option<&str>, category: Option<&str>) -> ListClientsQuery {
        ListClientsQuery {
            overdue: overdue.map(String::from),
            category: category.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_params_sort_by_name() {
        let params = query(None, None).to_list_params().unwrap();
        assert_eq!(params.filter_by_formula, None);
        assert_eq!(params.sort, vec![SortSpec::asc("Client Name")]);
        assert_eq!(params.max_records, Some(100));
    }

    #[test]
    fn test_overdue_params() {
        let params = query(Some("true"), Some("Warm Lead")).to_list_params().unwrap();
        assert_eq!(
            params.filter_by_formula.as_deref(),
            Some("AND({Days Since Last Outreach} >= 3, {Category} = \"Warm Lead\")")
        );
        assert_eq!(
            params.sort,
            vec![
                SortSpec::desc("Alert Level"),
                SortSpec::desc("Days Since Last Outreach")
            ]
        );
    }

    #[test]
    fn test_overdue_requires_literal_true() {
        assert!(!query(Some("1"), None).overdue_only());
        assert!(!query(Some("TRUE"), None).overdue_only());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = query(None, Some("Hot Lead")).to_list_params().unwrap_err();
        assert_eq!(err.message, "Invalid request data");
    }
}
