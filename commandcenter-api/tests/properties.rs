//! Property tests for handler-level behavior over generated records.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use commandcenter_api::{create_api_router, run_overdue_digest, AppState};
use commandcenter_test_utils::fixtures::contact_record;
use commandcenter_test_utils::generators::{
    arb_client_record, arb_interaction_type, arb_record_id,
};
use commandcenter_test_utils::{table, MockRecordStore};
use proptest::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn call(store: &MockRecordStore, request: Request<Body>) -> (StatusCode, Value) {
    let app = create_api_router(AppState::new(Arc::new(store.clone())));
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_overdue_listing_ordered_by_severity(
        records in prop::collection::vec(arb_client_record(), 0..20)
    ) {
        let store = MockRecordStore::new().with_records(table::CLIENTS, records.clone());
        let request = Request::builder()
            .uri("/api/clients?overdue=true")
            .body(Body::empty())
            .unwrap();

        let (status, body) = runtime().block_on(call(&store, request));

        prop_assert_eq!(status, StatusCode::OK);
        let clients = body["clients"].as_array().unwrap();
        prop_assert_eq!(clients.len(), records.len());

        let keys: Vec<(u64, i64)> = clients
            .iter()
            .map(|c| {
                (
                    c["severityRank"].as_u64().unwrap(),
                    c["daysSinceLastOutreach"].as_i64().unwrap(),
                )
            })
            .collect();
        for pair in keys.windows(2) {
            prop_assert!(pair[0] >= pair[1], "out of order: {:?}", pair);
        }
    }

    #[test]
    fn prop_digest_counts_every_client_once(
        records in prop::collection::vec(arb_client_record(), 0..30)
    ) {
        let store = MockRecordStore::new().with_records(table::CLIENTS, records.clone());

        let report = runtime()
            .block_on(run_overdue_digest(&store, 500))
            .unwrap();

        prop_assert_eq!(report.summary.total_overdue, records.len());
        prop_assert_eq!(report.summary.by_alert_level.values().sum::<usize>(), records.len());
        prop_assert_eq!(report.summary.by_owner.values().sum::<usize>(), records.len());
        prop_assert!(!report.summary.by_owner.contains_key(""));
    }

    #[test]
    fn prop_created_interaction_uses_contact_links(
        contact_id in arb_record_id(),
        client_ids in prop::collection::vec(arb_record_id(), 1..4),
        interaction_type in arb_interaction_type(),
    ) {
        let links: Vec<&str> = client_ids.iter().map(String::as_str).collect();
        let store = MockRecordStore::new().with_records(
            table::CONTACTS,
            [contact_record(&contact_id, "Maria Lopez", &links)],
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/interactions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"contactId": contact_id, "type": interaction_type}).to_string(),
            ))
            .unwrap();

        let (status, body) = runtime().block_on(call(&store, request));

        prop_assert_eq!(status, StatusCode::CREATED);
        prop_assert_eq!(&body["clientIds"], &json!(client_ids));

        let created = store.created();
        prop_assert_eq!(created.len(), 1);
        prop_assert_eq!(&created[0].1["Client"], &json!(client_ids));
        prop_assert_eq!(&created[0].1["Contact"], &json!([contact_id]));
        prop_assert_eq!(&created[0].1["Type"], &json!(interaction_type.as_db_str()));
    }
}
