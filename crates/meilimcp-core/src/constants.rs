/// Name of the single search tool exposed over MCP.
pub const HYBRID_SEARCH_TOOL: &str = "hybrid_search";

/// Prompt names exposed over MCP.
pub const ADJUST_SEMANTIC_RATIO_PROMPT: &str = "adjust_semantic_ratio";
pub const HYBRID_SEARCH_HELP_PROMPT: &str = "hybrid_search_help";

/// Default blend between keyword (0.0) and vector (1.0) scoring.
pub const DEFAULT_SEMANTIC_RATIO: f64 = 0.5;

/// Default minimum ranking score for returned hits.
pub const DEFAULT_RANKING_SCORE_THRESHOLD: f64 = 0.9;

/// Inclusive bounds advertised for `semantic_ratio`.
pub const SEMANTIC_RATIO_BOUNDS: (f64, f64) = (0.0, 1.0);

/// Inclusive bounds advertised for `ranking_score_threshold`.
pub const RANKING_SCORE_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 0.99);

/// Text returned to the host when a search matched nothing.
pub const NO_RESULTS_MESSAGE: &str =
    "no results found - please try with fewer or different keywords";

/// Default HTTP timeout for calls to the search index.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default data directory name under home.
pub const DEFAULT_DATA_DIR: &str = ".meilimcp";

/// Global config file name under the data directory.
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// MCP protocol revision announced during `initialize`.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name announced during `initialize`.
pub const SERVER_NAME: &str = "Meilisearch Hybrid Search MCP Server";
