//! Shared application state for Axum routers.

use std::sync::Arc;

use commandcenter_airtable::RecordStore;

use crate::jobs::DEFAULT_DIGEST_MAX_RECORDS;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Record store every handler reads from and writes to.
    pub store: Arc<dyn RecordStore>,
    /// Upper bound on clients collected by the overdue digest.
    pub digest_max_records: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            digest_max_records: DEFAULT_DIGEST_MAX_RECORDS,
        }
    }

    pub fn with_digest_max_records(mut self, max_records: u32) -> Self {
        self.digest_max_records = max_records;
        self
    }
}
