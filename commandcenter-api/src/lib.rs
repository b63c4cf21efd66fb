//! CommandCenter API - REST Layer for the CommandCenter CRM
//!
//! Axum endpoints for listing clients and contacts, logging interactions,
//! changing client categories, checking store health, and running the
//! overdue digest. All data lives in Airtable, reached through the
//! [`commandcenter_airtable::RecordStore`] held in [`AppState`].

pub mod config;
pub mod error;
pub mod jobs;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::{ApiConfig, DEFAULT_BIND_HOST, DEFAULT_PORT};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use jobs::{overdue_digest_task, run_overdue_digest, DigestConfig, DigestReport};
pub use routes::create_api_router;
pub use state::AppState;
pub use telemetry::{init_tracing, LogFormat};
