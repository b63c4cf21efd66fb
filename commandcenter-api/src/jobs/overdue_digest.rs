//! Overdue Digest
//!
//! Collects every contactable client at or past the overdue threshold,
//! groups them by alert level and owner, and logs a report. The same run
//! backs the `/api/overdueDigest` endpoint and the scheduled background
//! task.
//!
//! The digest is read-only: it never mutates records and sends nothing
//! beyond the log.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use commandcenter_airtable::{ListParams, RecordStore, RecordStoreResult, SortSpec};
use commandcenter_core::{
    field, group_by_alert_and_owner, overdue_digest_formula, record_to_client, table,
    DigestSummary, Timestamp,
};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const DEFAULT_DIGEST_INTERVAL_SECS: u64 = 86_400;
pub const DEFAULT_DIGEST_MAX_RECORDS: u32 = 500;
const DIGEST_PAGE_SIZE: u32 = 100;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestConfig {
    /// Whether the scheduled task runs. The endpoint is always available.
    pub enabled: bool,
    /// Time between scheduled runs; the first run happens one interval after start.
    pub interval: Duration,
    /// Upper bound on clients collected per run.
    pub max_records: u32,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: Duration::from_secs(DEFAULT_DIGEST_INTERVAL_SECS),
            max_records: DEFAULT_DIGEST_MAX_RECORDS,
        }
    }
}

impl DigestConfig {
    /// Create DigestConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `COMMANDCENTER_DIGEST_ENABLED`: "true" or "1" to schedule the task (default: false)
    /// - `COMMANDCENTER_DIGEST_INTERVAL_SECS`: Seconds between runs (default: 86400)
    /// - `COMMANDCENTER_DIGEST_MAX_RECORDS`: Clients collected per run (default: 500)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup("COMMANDCENTER_DIGEST_ENABLED")
            .map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        let interval = Duration::from_secs(
            lookup("COMMANDCENTER_DIGEST_INTERVAL_SECS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(DEFAULT_DIGEST_INTERVAL_SECS),
        );

        let max_records = lookup("COMMANDCENTER_DIGEST_MAX_RECORDS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|max: &u32| *max > 0)
            .unwrap_or(DEFAULT_DIGEST_MAX_RECORDS);

        Self {
            enabled,
            interval,
            max_records,
        }
    }
}

// ============================================================================
// DIGEST RUN
// ============================================================================

/// Result of one digest run.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestReport {
    pub generated_at: Timestamp,
    pub summary: DigestSummary,
    /// Report lines in the order they were logged.
    pub lines: Vec<String>,
}

impl DigestReport {
    pub fn message(&self) -> String {
        format!("Processed {} overdue clients", self.summary.total_overdue)
    }
}

/// List parameters for the overdue query: most severe first, then longest
/// since last outreach.
pub fn digest_list_params(max_records: u32) -> ListParams {
    ListParams::new()
        .filter(overdue_digest_formula())
        .sort_by(SortSpec::desc(field::ALERT_LEVEL))
        .sort_by(SortSpec::desc(field::DAYS_SINCE_LAST_OUTREACH))
        .max_records(max_records)
        .page_size(DIGEST_PAGE_SIZE.min(max_records))
}

/// Run the digest once.
pub async fn run_overdue_digest(
    store: &dyn RecordStore,
    max_records: u32,
) -> RecordStoreResult<DigestReport> {
    let generated_at = Utc::now();
    tracing::info!(at = %generated_at.to_rfc3339(), "Running overdue digest");

    let records = store
        .list_all(table::CLIENTS, &digest_list_params(max_records))
        .await?;

    let groups = group_by_alert_and_owner(records.iter().map(record_to_client));
    let lines = groups.report_lines();
    for line in &lines {
        tracing::info!("{}", line);
    }

    let summary = groups.summary();
    tracing::info!(
        total_overdue = summary.total_overdue,
        by_alert_level = ?summary.by_alert_level,
        by_owner = ?summary.by_owner,
        "Overdue digest summary"
    );

    Ok(DigestReport {
        generated_at,
        summary,
        lines,
    })
}

// ============================================================================
// BACKGROUND TASK
// ============================================================================

/// Background task that runs the digest on a fixed interval.
///
/// Runs until the shutdown signal is received and returns the number of
/// completed runs. A failed run is logged and the schedule continues.
pub async fn overdue_digest_task(
    store: Arc<dyn RecordStore>,
    config: DigestConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) -> u64 {
    let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        interval_secs = config.interval.as_secs(),
        max_records = config.max_records,
        "Overdue digest task started"
    );

    let mut runs = 0u64;
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    tracing::info!("Overdue digest task shutting down");
                    break;
                }
            }

            _ = ticker.tick() => {
                match run_overdue_digest(store.as_ref(), config.max_records).await {
                    Ok(report) => {
                        runs += 1;
                        tracing::info!(message = %report.message(), "Overdue digest completed");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Error in overdue digest");
                    }
                }
            }
        }
    }

    tracing::info!(runs, "Overdue digest task completed");
    runs
}
