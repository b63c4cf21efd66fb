//! Typed CRM entities.
//!
//! These are request-scoped copies of store records. They serialize in
//! camelCase, which is the shape the dashboard consumes.

use serde::{Deserialize, Serialize};

use crate::{AlertLevel, ClientCategory, InteractionType, RecordId, Timestamp};

/// A dance studio tracked by the CRM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: RecordId,
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub tags: Vec<String>,
    pub owner: String,
    pub category: ClientCategory,
    pub do_not_contact: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_outreach: Option<String>,
    pub days_since_last_outreach: i64,
    pub alert_level: AlertLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_touch_date: Option<String>,
    /// Derived from `alert_level`, 0 (None) to 4 (6 weeks).
    pub severity_rank: u8,
}

/// A person at a client studio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: RecordId,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub linked_client: Vec<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_category: Option<ClientCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub do_not_contact: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_outreach: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since_last_outreach: Option<i64>,
}

/// A logged outreach touchpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: RecordId,
    pub contact: Vec<RecordId>,
    pub client: Vec<RecordId>,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: Timestamp,
    pub created_by: String,
}
