//! CommandCenter Airtable - Record Store Client
//!
//! Authenticated access to the Airtable REST API: list (with field
//! selection, filter formula, sort and pagination), create, update and get.
//! Handlers depend on the [`RecordStore`] trait so they can run against an
//! in-memory store in tests.

pub mod client;
pub mod config;
pub mod error;
pub mod params;
pub mod store;

pub use client::AirtableClient;
pub use config::AirtableConfig;
pub use error::{RecordStoreError, RecordStoreResult};
pub use params::{ListParams, ListRecordsResponse, SortDirection, SortSpec};
pub use store::RecordStore;
