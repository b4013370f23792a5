use crate::config::EngineConfig;
use crate::error::QueryError;
use crate::filter::FilterExpression;
use crate::metadata::IndexMetadata;
use crate::schema::{self, HYBRID_SEARCH_ARGUMENTS};
use serde_json::Value;
use tracing::debug;

/// Fully validated hybrid search request.
///
/// The only constructor is [`build_query`], so every value of this type has
/// in-range numbers, a non-empty query, an embedder, and either a complete
/// filter or none.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridSearchQuery {
    keywords: String,
    semantic_ratio: f64,
    filter: Option<FilterExpression>,
    ranking_score_threshold: f64,
    embedder: String,
}

impl HybridSearchQuery {
    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn semantic_ratio(&self) -> f64 {
        self.semantic_ratio
    }

    pub fn filter(&self) -> Option<&FilterExpression> {
        self.filter.as_ref()
    }

    pub fn ranking_score_threshold(&self) -> f64 {
        self.ranking_score_threshold
    }

    pub fn embedder(&self) -> &str {
        &self.embedder
    }
}

/// Validate a raw `hybrid_search` argument map and build the query.
///
/// Required fields are checked before optional ones, then the filter pair,
/// then the embedder from configuration.
pub fn build_query(
    raw: &Value,
    config: &EngineConfig,
    metadata: &IndexMetadata,
) -> Result<HybridSearchQuery, QueryError> {
    let args = schema::decode_arguments(raw, HYBRID_SEARCH_ARGUMENTS)?;

    let keywords = args
        .text(schema::KEYWORDS)
        .ok_or(QueryError::MissingArgument {
            field: schema::KEYWORDS,
        })?
        .to_string();
    let semantic_ratio = args
        .number(schema::SEMANTIC_RATIO)
        .unwrap_or(crate::constants::DEFAULT_SEMANTIC_RATIO);
    let ranking_score_threshold = args
        .number(schema::RANKING_SCORE_THRESHOLD)
        .unwrap_or(crate::constants::DEFAULT_RANKING_SCORE_THRESHOLD);

    let filter = match (
        args.text(schema::FILTERABLE_ATTRIBUTE),
        args.text(schema::FILTER_WORD),
    ) {
        (Some(attribute), Some(word)) => {
            if config.strict_filter_attributes
                && !metadata.is_empty()
                && !metadata.allows(attribute)
            {
                return Err(QueryError::invalid_filter(format!(
                    "attribute '{}' is not filterable (available: {})",
                    attribute,
                    metadata.filterable_attributes().join(", ")
                )));
            }
            Some(FilterExpression::equals(attribute, word)?)
        }
        _ => None,
    };

    let embedder = config.require_embedder()?.to_string();

    let query = HybridSearchQuery {
        keywords,
        semantic_ratio,
        filter,
        ranking_score_threshold,
        embedder,
    };
    debug!(
        keywords = %query.keywords,
        semantic_ratio = query.semantic_ratio,
        ranking_score_threshold = query.ranking_score_threshold,
        filter = ?query.filter.as_ref().map(FilterExpression::render),
        "built hybrid search query"
    );
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProtocolErrorCode, ValueKind};
    use serde_json::json;

    fn engine_config() -> EngineConfig {
        EngineConfig {
            host: "http://localhost:7700".to_string(),
            api_key: None,
            index: "movies".to_string(),
            embedder: Some("openai".to_string()),
            timeout_ms: 1_000,
            filterable_attributes: None,
            strict_filter_attributes: false,
        }
    }

    fn build(raw: Value) -> Result<HybridSearchQuery, QueryError> {
        build_query(&raw, &engine_config(), &IndexMetadata::default())
    }

    #[test]
    fn defaults_apply_when_numbers_are_omitted() {
        let query = build(json!({"keywords": "space opera"})).unwrap();
        assert_eq!(query.keywords(), "space opera");
        assert_eq!(query.semantic_ratio(), 0.5);
        assert_eq!(query.ranking_score_threshold(), 0.9);
        assert_eq!(query.embedder(), "openai");
        assert!(query.filter().is_none());
    }

    #[test]
    fn supplied_numbers_are_kept() {
        let query = build(json!({
            "keywords": "space opera",
            "semantic_ratio": 0.8,
            "ranking_score_threshold": 0.25
        }))
        .unwrap();
        assert_eq!(query.semantic_ratio(), 0.8);
        assert_eq!(query.ranking_score_threshold(), 0.25);
    }

    #[test]
    fn filter_pair_builds_equality_predicate() {
        let query = build(json!({
            "keywords": "movie",
            "filterable_attribute": "genre",
            "filter_word": "Drama"
        }))
        .unwrap();
        assert_eq!(query.filter().unwrap().render(), "genre = 'Drama'");
    }

    #[test]
    fn half_a_filter_pair_is_silently_dropped() {
        for raw in [
            json!({"keywords": "movie", "filterable_attribute": "genre"}),
            json!({"keywords": "movie", "filter_word": "Drama"}),
            json!({"keywords": "movie", "filterable_attribute": "", "filter_word": "Drama"}),
            json!({"keywords": "movie", "filterable_attribute": "genre", "filter_word": ""}),
            json!({"keywords": "movie", "filterable_attribute": "genre", "filter_word": 7}),
        ] {
            let query = build(raw.clone()).unwrap();
            assert!(query.filter().is_none(), "unexpected filter for {raw}");
        }
    }

    #[test]
    fn missing_or_blank_keywords_is_missing_argument() {
        for raw in [json!({}), json!({"keywords": ""}), json!({"keywords": "  "})] {
            let err = build(raw).unwrap_err();
            assert_eq!(err.code(), ProtocolErrorCode::MissingArgument);
        }
    }

    #[test]
    fn numeric_keywords_is_type_mismatch() {
        let err = build(json!({"keywords": 42})).unwrap_err();
        assert_eq!(
            err,
            QueryError::TypeMismatch {
                field: "keywords",
                expected: ValueKind::Text
            }
        );
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        for raw in [
            json!({"keywords": "x", "semantic_ratio": 1.5}),
            json!({"keywords": "x", "semantic_ratio": -0.1}),
            json!({"keywords": "x", "ranking_score_threshold": 0.995}),
        ] {
            let err = build(raw).unwrap_err();
            assert_eq!(err.code(), ProtocolErrorCode::OutOfRange);
        }
    }

    #[test]
    fn validation_precedes_configuration() {
        let mut config = engine_config();
        config.embedder = None;
        let err =
            build_query(&json!({}), &config, &IndexMetadata::default()).unwrap_err();
        assert_eq!(err.code(), ProtocolErrorCode::MissingArgument);

        let err = build_query(&json!({"keywords": "x"}), &config, &IndexMetadata::default())
            .unwrap_err();
        assert_eq!(err.code(), ProtocolErrorCode::MissingConfiguration);
    }

    #[test]
    fn unsafe_attribute_is_invalid_filter() {
        let err = build(json!({
            "keywords": "x",
            "filterable_attribute": "genre = 'a' OR id",
            "filter_word": "Drama"
        }))
        .unwrap_err();
        assert_eq!(err.code(), ProtocolErrorCode::InvalidFilter);
    }

    #[test]
    fn unknown_attribute_passes_when_not_strict() {
        let metadata = IndexMetadata::new(vec!["genre".to_string()]);
        let query = build_query(
            &json!({"keywords": "x", "filterable_attribute": "author", "filter_word": "Tolkien"}),
            &engine_config(),
            &metadata,
        )
        .unwrap();
        assert_eq!(query.filter().unwrap().attribute(), "author");
    }

    #[test]
    fn unknown_attribute_is_rejected_when_strict() {
        let mut config = engine_config();
        config.strict_filter_attributes = true;
        let metadata = IndexMetadata::new(vec!["genre".to_string(), "year".to_string()]);

        let err = build_query(
            &json!({"keywords": "x", "filterable_attribute": "author", "filter_word": "Tolkien"}),
            &config,
            &metadata,
        )
        .unwrap_err();
        assert_eq!(err.code(), ProtocolErrorCode::InvalidFilter);
        assert!(err.to_string().contains("genre, year"));

        let query = build_query(
            &json!({"keywords": "x", "filterable_attribute": "genre", "filter_word": "Drama"}),
            &config,
            &metadata,
        )
        .unwrap();
        assert!(query.filter().is_some());
    }
}
