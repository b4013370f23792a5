use crate::error::SearchError;
use crate::request::{MeiliErrorBody, SearchRequest, SearchResponse};
use meilimcp_core::config::EngineConfig;
use meilimcp_core::metadata::IndexMetadata;
use meilimcp_core::query::HybridSearchQuery;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Remote index the tool forwards validated queries to.
pub trait SearchBackend: Send + Sync {
    fn search(&self, query: &HybridSearchQuery) -> Result<SearchResponse, SearchError>;

    fn filterable_attributes(&self) -> Result<IndexMetadata, SearchError>;

    /// Reachability check used by diagnostics and the HTTP `/health` route.
    fn health(&self) -> Result<Value, SearchError>;
}

/// Blocking Meilisearch HTTP client bound to one index.
pub struct MeiliClient {
    client: Client,
    host: String,
    index: String,
    api_key: Option<String>,
}

impl MeiliClient {
    pub fn new(config: &EngineConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms.max(1)))
            .build()
            .map_err(SearchError::transport)?;
        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn index_url(&self, suffix: &str) -> String {
        format!("{}/indexes/{}/{}", self.host, self.index, suffix)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.api_key.as_deref() {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

impl SearchBackend for MeiliClient {
    fn search(&self, query: &HybridSearchQuery) -> Result<SearchResponse, SearchError> {
        let body = serde_json::to_value(SearchRequest::from(query))
            .map_err(|e| SearchError::Serialization(e.to_string()))?;
        debug!(index = %self.index, "sending hybrid search request");

        let response = self
            .authorize(self.client.post(self.index_url("search")))
            .json(&body)
            .send()
            .map_err(SearchError::transport)?;
        let response = check_status(response)?;
        let parsed: SearchResponse = response.json().map_err(SearchError::decode)?;

        debug!(
            index = %self.index,
            hits = parsed.hits.len(),
            processing_time_ms = ?parsed.processing_time_ms,
            "hybrid search complete"
        );
        Ok(parsed)
    }

    fn filterable_attributes(&self) -> Result<IndexMetadata, SearchError> {
        let response = self
            .authorize(
                self.client
                    .get(self.index_url("settings/filterable-attributes")),
            )
            .send()
            .map_err(SearchError::transport)?;
        let response = check_status(response)?;
        let body: Value = response.json().map_err(SearchError::decode)?;
        Ok(IndexMetadata::from_settings_value(&body))
    }

    fn health(&self) -> Result<Value, SearchError> {
        let response = self
            .client
            .get(format!("{}/health", self.host))
            .send()
            .map_err(SearchError::transport)?;
        let response = check_status(response)?;
        response.json().map_err(SearchError::decode)
    }
}

/// Turn a non-2xx response into [`SearchError::Upstream`], keeping the
/// Meilisearch error code and message when the body carries them.
fn check_status(response: Response) -> Result<Response, SearchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().unwrap_or_default();
    let body: MeiliErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body
        .message
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
    warn!(status = status.as_u16(), code = ?body.code, "meilisearch returned an error");
    Err(SearchError::Upstream {
        status: status.as_u16(),
        code: body.code,
        message,
    })
}

/// Resolve index metadata once at startup: static configuration wins, the
/// index settings are fetched otherwise.
pub fn load_index_metadata(
    config: &EngineConfig,
    backend: &dyn SearchBackend,
) -> Result<IndexMetadata, SearchError> {
    if let Some(attrs) = &config.filterable_attributes {
        info!(
            count = attrs.len(),
            "using filterable attributes from configuration"
        );
        return Ok(IndexMetadata::new(attrs.clone()));
    }
    let metadata = backend.filterable_attributes()?;
    info!(
        index = %config.index,
        attributes = ?metadata.filterable_attributes(),
        "loaded filterable attributes from index settings"
    );
    Ok(metadata)
}
