//! CommandCenter Core - Domain Types
//!
//! Data types for the dance-studio CRM and the pure logic that sits between
//! the HTTP layer and the Airtable record store:
//! - Enums and entities (clients, contacts, interactions)
//! - The raw record shape returned by the store
//! - Typed mappers from raw records to entities
//! - Filter-formula construction for the store's query DSL
//! - Severity ranking and digest grouping
//!
//! Nothing in this crate performs I/O.

pub mod entities;
pub mod enums;
pub mod error;
pub mod formula;
pub mod mapping;
pub mod record;
pub mod severity;

use chrono::{DateTime, Utc};

/// Record identifier assigned by the store (e.g. `recXXXXXXXXXXXXXX`).
pub type RecordId = String;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

pub use entities::{Client, Contact, Interaction};
pub use enums::{AlertLevel, ClientCategory, InteractionType, ParseEnumError};
pub use error::{ConfigError, ValidationError};
pub use formula::{
    combine_and, escape_literal, overdue_digest_formula, FormulaBuilder, Predicate, SearchTarget,
    OVERDUE_THRESHOLD_DAYS,
};
pub use mapping::{
    linked_client_ids, record_to_client, record_to_contact, record_to_interaction, FieldReader,
};
pub use record::{field, table, AirtableRecord};
pub use severity::{
    group_by_alert_and_owner, severity_rank, sort_by_severity, AlertGroups, DigestSummary,
    UNASSIGNED_OWNER,
};
