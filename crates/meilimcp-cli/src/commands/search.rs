use anyhow::{Context, Result};
use meilimcp_core::config::Config;
use meilimcp_core::constants::NO_RESULTS_MESSAGE;
use meilimcp_core::metadata::IndexMetadata;
use meilimcp_core::query::build_query;
use meilimcp_core::schema;
use meilimcp_search::SearchBackend;
use serde_json::{Map, Value, json};
use tracing::debug;

pub struct SearchArgs {
    pub keywords: String,
    pub semantic_ratio: Option<f64>,
    pub ranking_score_threshold: Option<f64>,
    pub filterable_attribute: Option<String>,
    pub filter_word: Option<String>,
}

impl SearchArgs {
    /// The same argument object an MCP host would send to the tool.
    pub fn to_arguments(&self) -> Value {
        let mut args = Map::new();
        args.insert(schema::KEYWORDS.into(), json!(self.keywords));
        if let Some(ratio) = self.semantic_ratio {
            args.insert(schema::SEMANTIC_RATIO.into(), json!(ratio));
        }
        if let Some(threshold) = self.ranking_score_threshold {
            args.insert(schema::RANKING_SCORE_THRESHOLD.into(), json!(threshold));
        }
        if let Some(attr) = &self.filterable_attribute {
            args.insert(schema::FILTERABLE_ATTRIBUTE.into(), json!(attr));
        }
        if let Some(word) = &self.filter_word {
            args.insert(schema::FILTER_WORD.into(), json!(word));
        }
        Value::Object(args)
    }
}

pub fn run(config: &Config, args: &SearchArgs) -> Result<()> {
    let (engine, client) = super::connect(config)?;

    // Strict attribute checks need the index's filterable list; skip the fetch otherwise.
    let metadata = if engine.strict_filter_attributes {
        meilimcp_search::load_index_metadata(&engine, &client)
            .context("Failed to load filterable attributes")?
    } else {
        IndexMetadata::default()
    };

    let query = build_query(&args.to_arguments(), &engine, &metadata)
        .context("Invalid search arguments")?;
    let response = client.search(&query).context("Search failed")?;
    debug!(hits = response.hits.len(), "one-shot search complete");

    if response.hits.is_empty() {
        println!("{}", NO_RESULTS_MESSAGE);
        return Ok(());
    }
    let output =
        serde_json::to_string_pretty(&response.hits).context("Failed to encode search hits")?;
    println!("{}", output);
    Ok(())
}
