use meilimcp_core::filter::FilterExpression;
use meilimcp_core::query::HybridSearchQuery;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /indexes/{uid}/search`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    #[serde(rename = "q")]
    pub query: &'a str,
    pub hybrid: HybridParams<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a FilterExpression>,
    pub show_ranking_score: bool,
    pub ranking_score_threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridParams<'a> {
    pub semantic_ratio: f64,
    pub embedder: &'a str,
}

impl<'a> From<&'a HybridSearchQuery> for SearchRequest<'a> {
    fn from(query: &'a HybridSearchQuery) -> Self {
        Self {
            query: query.keywords(),
            hybrid: HybridParams {
                semantic_ratio: query.semantic_ratio(),
                embedder: query.embedder(),
            },
            filter: query.filter(),
            show_ranking_score: true,
            ranking_score_threshold: query.ranking_score_threshold(),
        }
    }
}

/// The parts of a search response this crate relies on. Hits are kept as raw
/// JSON so they can be forwarded untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<Value>,
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
}

/// Meilisearch error body (`{"message", "code", "type", "link"}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MeiliErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
