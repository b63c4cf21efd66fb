//! CommandCenter Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - `MockRecordStore`, an in-memory `RecordStore` that records every call
//! - Record fixtures in the store's raw shape
//! - Proptest generators for enums and raw records

pub use commandcenter_airtable::{
    ListParams, ListRecordsResponse, RecordStore, RecordStoreError, RecordStoreResult,
    SortDirection, SortSpec,
};
pub use commandcenter_core::{
    field, table, AirtableRecord, AlertLevel, ClientCategory, InteractionType, RecordId, Timestamp,
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// MOCK RECORD STORE
// ============================================================================

/// A single call made against [`MockRecordStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List { table: String, params: ListParams },
    Create { table: String, fields: Map<String, Value> },
    Update { table: String, id: String, fields: Map<String, Value> },
    Get { table: String, id: String },
}

impl StoreCall {
    pub fn is_mutation(&self) -> bool {
        matches!(self, StoreCall::Create { .. } | StoreCall::Update { .. })
    }
}

/// In-memory record store.
///
/// Formulas are not evaluated: `list` returns the seeded records of a table
/// in insertion order, honoring `max_records`, `page_size` and `offset`.
/// Tests seed exactly the records a formula would select and inspect
/// [`MockRecordStore::calls`] for the parameters that were sent.
#[derive(Debug, Clone, Default)]
pub struct MockRecordStore {
    tables: Arc<RwLock<HashMap<String, Vec<AirtableRecord>>>>,
    calls: Arc<RwLock<Vec<StoreCall>>>,
    failure: Arc<RwLock<Option<(u16, String)>>>,
    next_id: Arc<AtomicU64>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed records into a table, appended after existing ones.
    pub fn with_records(
        self,
        table: &str,
        records: impl IntoIterator<Item = AirtableRecord>,
    ) -> Self {
        self.insert(table, records);
        self
    }

    pub fn insert(&self, table: &str, records: impl IntoIterator<Item = AirtableRecord>) {
        write(&self.tables)
            .entry(table.to_string())
            .or_default()
            .extend(records);
    }

    /// Make every subsequent call fail with a store API error.
    pub fn fail_with(&self, status: u16, body: impl Into<String>) {
        *write(&self.failure) = Some((status, body.into()));
    }

    pub fn clear_failure(&self) {
        *write(&self.failure) = None;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        read(&self.calls).clone()
    }

    pub fn list_calls(&self) -> Vec<(String, ListParams)> {
        read(&self.calls)
            .iter()
            .filter_map(|call| match call {
                StoreCall::List { table, params } => Some((table.clone(), params.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn created(&self) -> Vec<(String, Map<String, Value>)> {
        read(&self.calls)
            .iter()
            .filter_map(|call| match call {
                StoreCall::Create { table, fields } => Some((table.clone(), fields.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn mutation_count(&self) -> usize {
        read(&self.calls).iter().filter(|c| c.is_mutation()).count()
    }

    pub fn records(&self, table: &str) -> Vec<AirtableRecord> {
        read(&self.tables).get(table).cloned().unwrap_or_default()
    }

    fn record_call(&self, call: StoreCall) -> RecordStoreResult<()> {
        write(&self.calls).push(call);
        match read(&self.failure).as_ref() {
            Some((status, body)) => Err(RecordStoreError::api(
                *status,
                status_text(*status),
                body.clone(),
            )),
            None => Ok(()),
        }
    }

    fn not_found(table: &str, id: &str) -> RecordStoreError {
        RecordStoreError::api(
            404,
            status_text(404),
            format!(r#"{{"error":"NOT_FOUND","table":"{}","id":"{}"}}"#, table, id),
        )
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn list(
        &self,
        table: &str,
        params: &ListParams,
    ) -> RecordStoreResult<ListRecordsResponse> {
        self.record_call(StoreCall::List {
            table: table.to_string(),
            params: params.clone(),
        })?;

        let all = self.records(table);
        let capped: Vec<AirtableRecord> = match params.max_records {
            Some(max) => all.into_iter().take(max as usize).collect(),
            None => all,
        };

        let start: usize = params
            .offset
            .as_deref()
            .and_then(|o| o.parse().ok())
            .unwrap_or(0);
        let page_size = params
            .page_size
            .unwrap_or(commandcenter_airtable::store::MAX_PAGE_SIZE) as usize;
        let end = (start + page_size).min(capped.len());

        let records = capped.get(start..end).map(<[_]>::to_vec).unwrap_or_default();
        let offset = (end < capped.len()).then(|| end.to_string());

        Ok(ListRecordsResponse { records, offset })
    }

    async fn create(
        &self,
        table: &str,
        fields: Map<String, Value>,
    ) -> RecordStoreResult<AirtableRecord> {
        self.record_call(StoreCall::Create {
            table: table.to_string(),
            fields: fields.clone(),
        })?;

        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let record = AirtableRecord::new(format!("recMock{:09}", n), fields, Utc::now());
        self.insert(table, [record.clone()]);
        Ok(record)
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> RecordStoreResult<AirtableRecord> {
        self.record_call(StoreCall::Update {
            table: table.to_string(),
            id: id.to_string(),
            fields: fields.clone(),
        })?;

        let mut tables = write(&self.tables);
        let record = tables
            .get_mut(table)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| Self::not_found(table, id))?;
        record.fields.extend(fields);
        Ok(record.clone())
    }

    async fn get(&self, table: &str, id: &str) -> RecordStoreResult<AirtableRecord> {
        self.record_call(StoreCall::Get {
            table: table.to_string(),
            id: id.to_string(),
        })?;

        self.records(table)
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(table, id))
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Raw records in the shape the store returns them.

    use super::*;

    /// Fixed creation time used by every fixture.
    pub fn created_time() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Build a record from a JSON object of fields.
    pub fn record(id: &str, fields: Value) -> AirtableRecord {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        AirtableRecord::new(id, fields, created_time())
    }

    pub fn client_record(
        id: &str,
        name: &str,
        owner: &str,
        alert_level: AlertLevel,
        days_since: i64,
    ) -> AirtableRecord {
        record(
            id,
            serde_json::json!({
                (field::CLIENT_NAME): name,
                (field::OWNER): { "name": owner },
                (field::CATEGORY): ClientCategory::WarmLead.as_db_str(),
                (field::ALERT_LEVEL): alert_level.as_db_str(),
                (field::DAYS_SINCE_LAST_OUTREACH): days_since,
            }),
        )
    }

    pub fn contact_record(id: &str, full_name: &str, linked_clients: &[&str]) -> AirtableRecord {
        let email = format!("{}@example.com", full_name.to_lowercase().replace(' ', "."));
        record(
            id,
            serde_json::json!({
                (field::FULL_NAME): full_name,
                (field::EMAIL): email,
                (field::LINKED_CLIENT): linked_clients,
            }),
        )
    }

    pub fn interaction_record(
        id: &str,
        contact_id: &str,
        client_id: &str,
        interaction_type: InteractionType,
        timestamp: &str,
    ) -> AirtableRecord {
        record(
            id,
            serde_json::json!({
                (field::CONTACT): [contact_id],
                (field::CLIENT): [client_id],
                (field::TYPE): interaction_type.as_db_str(),
                (field::TIMESTAMP): timestamp,
                (field::CREATED_BY): { "name": "Jane Smith" },
            }),
        )
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for CommandCenter types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_alert_level() -> impl Strategy<Value = AlertLevel> {
        prop::sample::select(AlertLevel::ALL.to_vec())
    }

    pub fn arb_category() -> impl Strategy<Value = ClientCategory> {
        prop::sample::select(ClientCategory::ALL.to_vec())
    }

    pub fn arb_interaction_type() -> impl Strategy<Value = InteractionType> {
        prop::sample::select(InteractionType::ALL.to_vec())
    }

    pub fn arb_record_id() -> impl Strategy<Value = RecordId> {
        "rec[A-Za-z0-9]{14}"
    }

    pub fn arb_owner() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[A-Z][a-z]{2,8} [A-Z][a-z]{2,8}"]
    }

    /// A client record with a random category, alert level, owner and day
    /// count.
    pub fn arb_client_record() -> impl Strategy<Value = AirtableRecord> {
        (
            arb_record_id(),
            "[A-Z][a-z]{3,10} Dance",
            arb_owner(),
            arb_category(),
            arb_alert_level(),
            0i64..120,
        )
            .prop_map(|(id, name, owner, category, level, days)| {
                let mut record = fixtures::client_record(&id, &name, &owner, level, days);
                record.fields.insert(
                    field::CATEGORY.to_string(),
                    Value::from(category.as_db_str()),
                );
                record
            })
    }
}

// ============================================================================
// TESTS
// ============================================================================
