//! Async record store trait.

use async_trait::async_trait;
use commandcenter_core::AirtableRecord;
use serde_json::{Map, Value};

use crate::{ListParams, ListRecordsResponse, RecordStoreResult};

/// Largest page the store returns for a single list call.
pub const MAX_PAGE_SIZE: u32 = 100;

/// CRUD access to the tables of one base.
///
/// Implementations make exactly one remote call per method, except
/// [`RecordStore::list_all`] which follows pagination.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List one page of records.
    async fn list(
        &self,
        table: &str,
        params: &ListParams,
    ) -> RecordStoreResult<ListRecordsResponse>;

    /// Create a record from a fields object.
    async fn create(
        &self,
        table: &str,
        fields: Map<String, Value>,
    ) -> RecordStoreResult<AirtableRecord>;

    /// Partial update; fields not supplied are left unchanged.
    async fn update(
        &self,
        table: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> RecordStoreResult<AirtableRecord>;

    /// Fetch a single record by id.
    async fn get(&self, table: &str, id: &str) -> RecordStoreResult<AirtableRecord>;

    /// Follow `offset` tokens until the store runs out of pages or
    /// `params.max_records` records were collected.
    async fn list_all(
        &self,
        table: &str,
        params: &ListParams,
    ) -> RecordStoreResult<Vec<AirtableRecord>> {
        let limit = params.max_records.map(|m| m as usize);
        let mut page_params = params.clone().offset(None);
        let mut records = Vec::new();

        loop {
            let page = self.list(table, &page_params).await?;
            records.extend(page.records);

            if let Some(limit) = limit {
                if records.len() >= limit {
                    records.truncate(limit);
                    break;
                }
            }

            match page.offset {
                Some(next) => page_params = page_params.offset(Some(next)),
                None => break,
            }
        }

        tracing::debug!(table, count = records.len(), "Listed all pages");
        Ok(records)
    }
}
