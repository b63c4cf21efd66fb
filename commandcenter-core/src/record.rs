//! Raw record shape returned by the Airtable record store.
//!
//! Records carry a generic `fields` object keyed by the human-readable field
//! names configured in the base. Field and table names are exact strings;
//! they live here so the mappers, formula builder and handlers agree on them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{RecordId, Timestamp};

/// Table names in the base.
pub mod table {
    pub const CLIENTS: &str = "Clients";
    pub const CONTACTS: &str = "Contacts";
    pub const INTERACTIONS: &str = "Interactions";
}

/// Field names, exactly as configured in the base.
pub mod field {
    // Clients
    pub const CLIENT_NAME: &str = "Client Name";
    pub const CITY: &str = "City";
    pub const PROVINCE_STATE: &str = "Province/State";
    pub const WEBSITE: &str = "Website";
    pub const TAGS: &str = "Tags";
    pub const CATEGORY: &str = "Category";
    pub const CLIENT_NOTES: &str = "Client Notes";
    pub const ALERT_LEVEL: &str = "Alert Level";
    pub const NEXT_TOUCH_DATE: &str = "Next Touch Date";

    // Shared by clients and contacts
    pub const OWNER: &str = "Owner";
    pub const DO_NOT_CONTACT: &str = "Do Not Contact";
    pub const LAST_OUTREACH: &str = "Last Outreach";
    pub const DAYS_SINCE_LAST_OUTREACH: &str = "Days Since Last Outreach";

    // Contacts
    pub const FULL_NAME: &str = "Full Name";
    pub const TITLE: &str = "Title";
    pub const EMAIL: &str = "Email";
    pub const PHONE: &str = "Phone";
    pub const LINKED_CLIENT: &str = "Linked Client";
    pub const INHERITED_CATEGORY: &str = "Inherited Category";
    pub const QUICK_NOTES: &str = "Quick Notes";

    // Interactions
    pub const CONTACT: &str = "Contact";
    pub const CLIENT: &str = "Client";
    pub const TYPE: &str = "Type";
    pub const NOTES: &str = "Notes";
    pub const TIMESTAMP: &str = "Timestamp";
    pub const CREATED_BY: &str = "Created By";
}

/// A single record as returned by the store.
///
/// `fields` is untrusted: any field may be missing or carry an unexpected
/// shape. Use [`crate::mapping`] to turn it into a typed entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirtableRecord {
    pub id: RecordId,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(rename = "createdTime")]
    pub created_time: Timestamp,
}

impl AirtableRecord {
    pub fn new(
        id: impl Into<RecordId>,
        fields: Map<String, Value>,
        created_time: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            fields,
            created_time,
        }
    }

    /// Raw access to a field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
