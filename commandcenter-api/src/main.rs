//! CommandCenter API Server Entry Point
//!
//! Loads configuration, starts the overdue digest schedule, and serves the
//! Axum router until Ctrl-C.

use std::sync::Arc;

use axum::Router;
use commandcenter_airtable::{AirtableClient, RecordStore};
use commandcenter_api::{
    create_api_router, init_tracing, overdue_digest_task, ApiConfig, ApiError, ApiResult,
    AppState,
};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> ApiResult<()> {
    let config = ApiConfig::from_env()?;
    init_tracing(config.log_format)?;

    let addr = config.bind_addr()?;
    let store: Arc<dyn RecordStore> = Arc::new(AirtableClient::new(config.airtable.clone()));
    let state =
        AppState::new(store.clone()).with_digest_max_records(config.digest.max_records);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let digest_handle = if config.digest.enabled {
        Some(tokio::spawn(overdue_digest_task(
            store,
            config.digest.clone(),
            shutdown_rx,
        )))
    } else {
        tracing::info!("Overdue digest schedule disabled");
        None
    };

    let app: Router = create_api_router(state);

    tracing::info!(%addr, base_id = %config.airtable.base_id, "Starting CommandCenter API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    let _ = shutdown_tx.send(true);
    if let Some(handle) = digest_handle {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Overdue digest task ended abnormally");
        }
    }

    Ok(())
}
