//! Background Jobs for CommandCenter API
//!
//! - `overdue_digest`: Periodic summary of overdue clients
//!
//! # Usage
//!
//! ```ignore
//! use commandcenter_api::jobs::{overdue_digest_task, DigestConfig};
//! use tokio::sync::watch;
//!
//! let (shutdown_tx, shutdown_rx) = watch::channel(false);
//! tokio::spawn(overdue_digest_task(store.clone(), DigestConfig::from_env(), shutdown_rx));
//!
//! // On shutdown
//! let _ = shutdown_tx.send(true);
//! ```

pub mod overdue_digest;

pub use overdue_digest::{
    digest_list_params, overdue_digest_task, run_overdue_digest, DigestConfig, DigestReport,
    DEFAULT_DIGEST_INTERVAL_SECS, DEFAULT_DIGEST_MAX_RECORDS,
};
