//! Airtable HTTP client

use async_trait::async_trait;
use commandcenter_core::AirtableRecord;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::{
    AirtableConfig, ListParams, ListRecordsResponse, RecordStore, RecordStoreError,
    RecordStoreResult,
};

/// Record store backed by the Airtable REST API.
///
/// Holds one `reqwest::Client` for connection reuse. No retries and no
/// request timeout are applied.
#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    config: AirtableConfig,
}

impl AirtableClient {
    pub fn new(config: AirtableConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    pub fn with_http_client(client: Client, config: AirtableConfig) -> Self {
        Self { client, config }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.config.base_url(), urlencoding::encode(table))
    }

    fn record_url(&self, table: &str, id: &str) -> String {
        format!("{}/{}", self.table_url(table), urlencoding::encode(id))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .header("Content-Type", "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> RecordStoreResult<T> {
        let response = builder.send().await?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Map a non-2xx response to [`RecordStoreError::Api`] carrying the body verbatim.
async fn check_status(response: Response) -> RecordStoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let status_text = status.canonical_reason().unwrap_or("").to_string();
    tracing::warn!(status = status.as_u16(), body = %body, "Airtable request failed");
    Err(RecordStoreError::api(status.as_u16(), status_text, body))
}

fn fields_body(fields: Map<String, Value>) -> Value {
    json!({ "fields": fields })
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn list(
        &self,
        table: &str,
        params: &ListParams,
    ) -> RecordStoreResult<ListRecordsResponse> {
        let url = self.table_url(table);
        tracing::debug!(table, formula = ?params.filter_by_formula, "Listing records");

        let mut builder = self.request(Method::GET, &url);
        let pairs = params.to_query_pairs();
        if !pairs.is_empty() {
            builder = builder.query(&pairs);
        }
        self.send(builder).await
    }

    async fn create(
        &self,
        table: &str,
        fields: Map<String, Value>,
    ) -> RecordStoreResult<AirtableRecord> {
        let url = self.table_url(table);
        tracing::debug!(table, "Creating record");
        self.send(self.request(Method::POST, &url).json(&fields_body(fields)))
            .await
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> RecordStoreResult<AirtableRecord> {
        let url = self.record_url(table, id);
        tracing::debug!(table, id, "Updating record");
        self.send(self.request(Method::PATCH, &url).json(&fields_body(fields)))
            .await
    }

    async fn get(&self, table: &str, id: &str) -> RecordStoreResult<AirtableRecord> {
        let url = self.record_url(table, id);
        self.send(self.request(Method::GET, &url)).await
    }
}

impl std::fmt::Debug for AirtableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableClient")
            .field("base_url", &self.config.base_url())
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}
