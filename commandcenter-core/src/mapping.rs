//! Typed decoding of store records into CRM entities.
//!
//! The store's `fields` object is treated as untrusted input. Each entity
//! field is read through [`FieldReader`], which declares the shape it
//! expects; a value with any other shape is treated as absent. Absent and
//! falsy values (null, `""`, `false`, `0`, `[]`) resolve to the entity's
//! documented default, so mapping never fails.

use serde_json::{Map, Value};
use std::str::FromStr;

use crate::record::field;
use crate::{AirtableRecord, Client, Contact, Interaction, RecordId, Timestamp};

// ============================================================================
// FIELD READER
// ============================================================================

/// Shape-checked accessors over a record's fields bag.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    pub fn new(record: &'a AirtableRecord) -> Self {
        Self {
            fields: &record.fields,
        }
    }

    /// Field value, or `None` when missing or falsy.
    fn present(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name).filter(|value| !is_falsy(value))
    }

    /// Non-empty text field.
    pub fn text(&self, name: &str) -> Option<String> {
        self.present(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Checkbox field. Accepts `true` or a non-zero number.
    pub fn flag(&self, name: &str) -> bool {
        match self.present(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            _ => false,
        }
    }

    /// Whole-number field. Formula fields may yield floats; those are truncated.
    pub fn whole_number(&self, name: &str) -> Option<i64> {
        match self.fields.get(name)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            _ => None,
        }
    }

    /// List of strings (multi-select or linked-record ids). A bare string is
    /// read as a one-element list.
    pub fn strings(&self, name: &str) -> Vec<String> {
        match self.present(name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Person field: either a plain name or a collaborator object with `name`.
    pub fn person(&self, name: &str) -> Option<String> {
        match self.present(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj
                .get("name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            _ => None,
        }
    }

    /// Single-select field parsed into an enum. Some bases expose the select
    /// as a lookup array, in which case the first element is used. Labels
    /// outside the enum are logged and treated as absent.
    pub fn choice<T: FromStr>(&self, name: &str) -> Option<T> {
        let label = match self.present(name)? {
            Value::String(s) => s.as_str(),
            Value::Array(items) => items.first().and_then(Value::as_str)?,
            _ => return None,
        };

        match label.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(field = name, label, "Unrecognized option label, using default");
                None
            }
        }
    }

    /// Date-time field: RFC 3339, or a date-only value read as midnight UTC.
    /// A present value that parses as neither is logged and treated as absent.
    pub fn timestamp(&self, name: &str) -> Option<Timestamp> {
        let raw = self.present(name)?.as_str()?;
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&chrono::Utc));
        }
        if let Some(midnight) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Some(midnight.and_utc());
        }

        tracing::warn!(field = name, value = raw, "Unparseable date value, ignoring");
        None
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

// ============================================================================
// MAPPERS
// ============================================================================

/// Map a `Clients` record.
pub fn record_to_client(record: &AirtableRecord) -> Client {
    let f = FieldReader::new(record);
    let alert_level = f.choice(field::ALERT_LEVEL).unwrap_or_default();

    Client {
        id: record.id.clone(),
        client_name: f.text(field::CLIENT_NAME).unwrap_or_default(),
        city: f.text(field::CITY),
        province_state: f.text(field::PROVINCE_STATE),
        website: f.text(field::WEBSITE),
        tags: f.strings(field::TAGS),
        owner: f.person(field::OWNER).unwrap_or_default(),
        category: f.choice(field::CATEGORY).unwrap_or_default(),
        do_not_contact: f.flag(field::DO_NOT_CONTACT),
        client_notes: f.text(field::CLIENT_NOTES),
        last_outreach: f.text(field::LAST_OUTREACH),
        days_since_last_outreach: f.whole_number(field::DAYS_SINCE_LAST_OUTREACH).unwrap_or(0),
        alert_level,
        next_touch_date: f.text(field::NEXT_TOUCH_DATE),
        severity_rank: crate::severity_rank(alert_level),
    }
}

/// Map a `Contacts` record.
pub fn record_to_contact(record: &AirtableRecord) -> Contact {
    let f = FieldReader::new(record);

    Contact {
        id: record.id.clone(),
        full_name: f.text(field::FULL_NAME).unwrap_or_default(),
        title: f.text(field::TITLE),
        email: f.text(field::EMAIL),
        phone: f.text(field::PHONE),
        linked_client: f.strings(field::LINKED_CLIENT),
        inherited_category: f.choice(field::INHERITED_CATEGORY),
        owner: f.person(field::OWNER),
        do_not_contact: f.flag(field::DO_NOT_CONTACT),
        quick_notes: f.text(field::QUICK_NOTES),
        last_outreach: f.text(field::LAST_OUTREACH),
        days_since_last_outreach: f.whole_number(field::DAYS_SINCE_LAST_OUTREACH),
    }
}

/// Map an `Interactions` record. The timestamp falls back to the record's
/// creation time.
pub fn record_to_interaction(record: &AirtableRecord) -> Interaction {
    let f = FieldReader::new(record);

    Interaction {
        id: record.id.clone(),
        contact: f.strings(field::CONTACT),
        client: f.strings(field::CLIENT),
        interaction_type: f.choice(field::TYPE).unwrap_or_default(),
        notes: f.text(field::NOTES),
        timestamp: f.timestamp(field::TIMESTAMP).unwrap_or(record.created_time),
        created_by: f.person(field::CREATED_BY).unwrap_or_default(),
    }
}

/// Linked client ids of a contact record, without mapping the whole contact.
pub fn linked_client_ids(record: &AirtableRecord) -> Vec<RecordId> {
    FieldReader::new(record).strings(field::LINKED_CLIENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlertLevel, ClientCategory, InteractionType};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn record(id: &str, fields: Value) -> AirtableRecord {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        AirtableRecord::new(id, fields, Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
    }

    #[test]
    fn test_client_with_all_fields() {
        let rec = record(
            "recClient1",
            json!({
                "Client Name": "Elite Dance Academy",
                "City": "Vancouver",
                "Province/State": "BC",
                "Website": "https://elite.example",
                "Tags": ["Recital", "Competition"],
                "Owner": {"id": "usr1", "email": "jane@example.com", "name": "Jane Smith"},
                "Category": "Previous Client",
                "Do Not Contact": true,
                "Client Notes": "Prefers email",
                "Last Outreach": "2024-04-20",
                "Days Since Last Outreach": 11,
                "Alert Level": "1 week",
                "Next Touch Date": "2024-05-03"
            }),
        );

        let client = record_to_client(&rec);
        assert_eq!(client.id, "recClient1");
        assert_eq!(client.client_name, "Elite Dance Academy");
        assert_eq!(client.city.as_deref(), Some("Vancouver"));
        assert_eq!(client.province_state.as_deref(), Some("BC"));
        assert_eq!(client.website.as_deref(), Some("https://elite.example"));
        assert_eq!(client.tags, vec!["Recital", "Competition"]);
        assert_eq!(client.owner, "Jane Smith");
        assert_eq!(client.category, ClientCategory::PreviousClient);
        assert!(client.do_not_contact);
        assert_eq!(client.client_notes.as_deref(), Some("Prefers email"));
        assert_eq!(client.last_outreach.as_deref(), Some("2024-04-20"));
        assert_eq!(client.days_since_last_outreach, 11);
        assert_eq!(client.alert_level, AlertLevel::OneWeek);
        assert_eq!(client.next_touch_date.as_deref(), Some("2024-05-03"));
        assert_eq!(client.severity_rank, 2);
    }

    #[test]
    fn test_client_defaults_when_fields_absent() {
        let client = record_to_client(&record("recBare", json!({})));

        assert_eq!(client.client_name, "");
        assert!(client.tags.is_empty());
        assert_eq!(client.owner, "");
        assert_eq!(client.category, ClientCategory::ColdLead);
        assert!(!client.do_not_contact);
        assert_eq!(client.days_since_last_outreach, 0);
        assert_eq!(client.alert_level, AlertLevel::None);
        assert_eq!(client.severity_rank, 0);
        assert!(client.city.is_none());
        assert!(client.next_touch_date.is_none());
    }

    #[test]
    fn test_client_falsy_values_use_defaults() {
        let rec = record(
            "recFalsy",
            json!({
                "Client Name": "",
                "Category": "",
                "Alert Level": null,
                "Do Not Contact": false,
                "Tags": []
            }),
        );
        let client = record_to_client(&rec);
        assert_eq!(client.client_name, "");
        assert_eq!(client.category, ClientCategory::ColdLead);
        assert_eq!(client.alert_level, AlertLevel::None);
        assert!(!client.do_not_contact);
        assert!(client.tags.is_empty());
    }

    #[test]
    fn test_owner_as_plain_string() {
        let client = record_to_client(&record("rec1", json!({"Owner": "John Doe"})));
        assert_eq!(client.owner, "John Doe");
    }

    #[test]
    fn test_category_from_lookup_array() {
        let client = record_to_client(&record("rec1", json!({"Category": ["Warm Lead"]})));
        assert_eq!(client.category, ClientCategory::WarmLead);
    }

    #[test]
    fn test_unknown_labels_fall_back() {
        let rec = record("rec1", json!({"Category": "Hot Lead", "Alert Level": "2 days"}));
        let client = record_to_client(&rec);
        assert_eq!(client.category, ClientCategory::ColdLead);
        assert_eq!(client.alert_level, AlertLevel::None);
    }

    #[test]
    fn test_wrong_shapes_are_absent() {
        let rec = record(
            "rec1",
            json!({
                "Client Name": 42,
                "Tags": "Recital",
                "Days Since Last Outreach": "9",
                "Do Not Contact": "yes"
            }),
        );
        let client = record_to_client(&rec);
        assert_eq!(client.client_name, "");
        assert_eq!(client.tags, vec!["Recital"]);
        assert_eq!(client.days_since_last_outreach, 0);
        assert!(!client.do_not_contact);
    }

    #[test]
    fn test_days_since_from_formula_float() {
        let client =
            record_to_client(&record("rec1", json!({"Days Since Last Outreach": 12.75})));
        assert_eq!(client.days_since_last_outreach, 12);
    }

    #[test]
    fn test_do_not_contact_numeric_checkbox() {
        let client = record_to_client(&record("rec1", json!({"Do Not Contact": 1})));
        assert!(client.do_not_contact);
    }

    #[test]
    fn test_contact_mapping() {
        let rec = record(
            "recContact1",
            json!({
                "Full Name": "Maria Lopez",
                "Title": "Studio Director",
                "Email": "maria@example.com",
                "Phone": "555-0101",
                "Linked Client": ["recClient1"],
                "Inherited Category": ["Warm Lead"],
                "Owner": {"name": "Jane Smith"},
                "Quick Notes": "Call after 3pm",
                "Last Outreach": "2024-04-28",
                "Days Since Last Outreach": 3
            }),
        );

        let contact = record_to_contact(&rec);
        assert_eq!(contact.full_name, "Maria Lopez");
        assert_eq!(contact.title.as_deref(), Some("Studio Director"));
        assert_eq!(contact.email.as_deref(), Some("maria@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("555-0101"));
        assert_eq!(contact.linked_client, vec!["recClient1"]);
        assert_eq!(contact.inherited_category, Some(ClientCategory::WarmLead));
        assert_eq!(contact.owner.as_deref(), Some("Jane Smith"));
        assert!(!contact.do_not_contact);
        assert_eq!(contact.quick_notes.as_deref(), Some("Call after 3pm"));
        assert_eq!(contact.days_since_last_outreach, Some(3));
    }

    #[test]
    fn test_contact_defaults() {
        let contact = record_to_contact(&record("recC", json!({})));
        assert_eq!(contact.full_name, "");
        assert!(contact.linked_client.is_empty());
        assert!(contact.owner.is_none());
        assert!(contact.inherited_category.is_none());
        assert!(!contact.do_not_contact);
        assert!(contact.days_since_last_outreach.is_none());
    }

    #[test]
    fn test_interaction_timestamp_fallback() {
        let rec = record(
            "recInt1",
            json!({
                "Contact": ["recContact1"],
                "Client": ["recClient1"],
                "Type": "Phone",
                "Created By": {"name": "Jane Smith"}
            }),
        );

        let interaction = record_to_interaction(&rec);
        assert_eq!(interaction.contact, vec!["recContact1"]);
        assert_eq!(interaction.client, vec!["recClient1"]);
        assert_eq!(interaction.interaction_type, InteractionType::Phone);
        assert!(interaction.notes.is_none());
        assert_eq!(interaction.timestamp, rec.created_time);
        assert_eq!(interaction.created_by, "Jane Smith");
    }

    #[test]
    fn test_interaction_explicit_timestamp() {
        let rec = record(
            "recInt2",
            json!({"Type": "Meeting", "Notes": "Demo", "Timestamp": "2024-04-30T15:00:00.000Z"}),
        );
        let interaction = record_to_interaction(&rec);
        assert_eq!(
            interaction.timestamp,
            Utc.with_ymd_and_hms(2024, 4, 30, 15, 0, 0).unwrap()
        );
        assert_eq!(interaction.notes.as_deref(), Some("Demo"));
        assert_eq!(interaction.created_by, "");
    }

    #[test]
    fn test_interaction_date_only_timestamp() {
        let rec = record("recInt3", json!({"Type": "Phone", "Timestamp": "2024-04-20"}));
        let interaction = record_to_interaction(&rec);
        assert_ne!(interaction.timestamp, rec.created_time);
        assert_eq!(
            interaction.timestamp,
            Utc.with_ymd_and_hms(2024, 4, 20, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unparseable_timestamp_falls_back() {
        let rec = record("recInt4", json!({"Type": "Email", "Timestamp": "last Tuesday"}));
        assert_eq!(record_to_interaction(&rec).timestamp, rec.created_time);
    }

    #[test]
    fn test_linked_client_ids() {
        let rec = record("recC", json!({"Linked Client": ["rec123", "rec456"]}));
        assert_eq!(linked_client_ids(&rec), vec!["rec123", "rec456"]);
        assert!(linked_client_ids(&record("recD", json!({}))).is_empty());
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::{AlertLevel, ClientCategory};
    use chrono::Utc;
    use proptest::prelude::*;
    use serde_json::json;

    fn arb_category() -> impl Strategy<Value = ClientCategory> {
        prop::sample::select(ClientCategory::ALL.to_vec())
    }

    fn arb_alert_level() -> impl Strategy<Value = AlertLevel> {
        prop::sample::select(AlertLevel::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A record with every optional client field present maps back to
        /// exactly the values that were written.
        #[test]
        fn prop_client_fields_survive_mapping(
            name in "[A-Za-z][A-Za-z ]{0,30}",
            city in "[A-Za-z]{1,20}",
            owner in "[A-Za-z][A-Za-z ]{0,20}",
            tags in prop::collection::vec("[A-Za-z]{1,10}", 1..4),
            category in arb_category(),
            alert_level in arb_alert_level(),
            days in 1i64..400,
        ) {
            let fields = json!({
                "Client Name": name,
                "City": city,
                "Owner": owner,
                "Tags": tags,
                "Category": category.as_db_str(),
                "Alert Level": alert_level.as_db_str(),
                "Days Since Last Outreach": days,
                "Do Not Contact": true,
            });
            let rec = AirtableRecord::new(
                "recProp",
                fields.as_object().cloned().unwrap_or_default(),
                Utc::now(),
            );

            let client = record_to_client(&rec);
            prop_assert_eq!(&client.client_name, &name);
            prop_assert_eq!(client.city.as_deref(), Some(city.as_str()));
            prop_assert_eq!(&client.owner, &owner);
            prop_assert_eq!(&client.tags, &tags);
            prop_assert_eq!(client.category, category);
            prop_assert_eq!(client.alert_level, alert_level);
            prop_assert_eq!(client.days_since_last_outreach, days);
            prop_assert!(client.do_not_contact);
            prop_assert_eq!(client.severity_rank, alert_level.severity_rank());
        }

        /// Mapping never panics on arbitrary scalar junk in known fields.
        #[test]
        fn prop_client_mapping_is_total(junk in ".*", n in any::<i64>()) {
            let fields = json!({
                "Client Name": n,
                "Category": junk,
                "Alert Level": [junk.clone()],
                "Owner": {"name": n},
                "Days Since Last Outreach": junk,
            });
            let rec = AirtableRecord::new(
                "recJunk",
                fields.as_object().cloned().unwrap_or_default(),
                Utc::now(),
            );
            let client = record_to_client(&rec);
            prop_assert_eq!(client.days_since_last_outreach, 0);
            prop_assert_eq!(client.owner, "");
        }
    }
}
