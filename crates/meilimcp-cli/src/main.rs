mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use meilimcp_core::config::{Config, ConfigOverrides};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "meilimcp",
    version,
    about = "MCP server exposing Meilisearch hybrid search to AI agents",
    long_about = "meilimcp validates agent-supplied search arguments, builds a hybrid\n\
        (keyword + vector) Meilisearch query, and returns the hits over the\n\
        Model Context Protocol.\n\n\
        Quick start:\n  \
        meilimcp --host http://localhost:7700 --index movies --embedder default doctor\n  \
        meilimcp search \"space opera\" --semantic-ratio 0.8\n  \
        meilimcp serve-mcp"
)]
struct Cli {
    /// Enable verbose logging (set log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: ~/.meilimcp/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Meilisearch host URL [env: MEILI_HOST]
    #[arg(long, global = true)]
    host: Option<String>,

    /// Meilisearch API key [env: MEILI_API_KEY]
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Index to search [env: MEILI_INDEX]
    #[arg(long, global = true)]
    index: Option<String>,

    /// Embedder name used for the semantic half of hybrid search [env: MEILI_EMBEDDER]
    #[arg(long, global = true)]
    embedder: Option<String>,

    /// HTTP timeout for Meilisearch calls in milliseconds [env: MEILIMCP_TIMEOUT_MS]
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server
    ///
    /// Loads configuration, reads the index's filterable attributes once,
    /// then serves JSON-RPC over stdio (default) or HTTP.
    ///
    /// Examples:
    ///   meilimcp serve-mcp
    ///   meilimcp serve-mcp --transport http --port 9100
    ServeMcp {
        /// Transport to serve on
        #[arg(long, value_enum, default_value_t = Transport::Stdio)]
        transport: Transport,

        /// Bind address for the HTTP transport
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        /// Port for the HTTP transport
        #[arg(long, default_value_t = 9100)]
        port: u16,
    },
    /// Run one hybrid search and print the hits as JSON
    ///
    /// Arguments go through the same validation as the MCP tool.
    ///
    /// Example: meilimcp search "movie about space" --filterable-attribute genre --filter-word Drama
    Search {
        /// Search keywords
        keywords: String,

        /// Keyword/vector blend, 0.0 to 1.0
        #[arg(long)]
        semantic_ratio: Option<f64>,

        /// Minimum ranking score, 0.0 to 0.99
        #[arg(long)]
        ranking_score_threshold: Option<f64>,

        /// Attribute to filter on (requires --filter-word)
        #[arg(long)]
        filterable_attribute: Option<String>,

        /// Value the attribute must equal (requires --filterable-attribute)
        #[arg(long)]
        filter_word: Option<String>,
    },
    /// Check configuration and index reachability
    ///
    /// Prints the resolved configuration with the API key masked, checks
    /// Meilisearch health, and lists the index's filterable attributes.
    ///
    /// Example: meilimcp doctor
    Doctor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_file = cli.config.as_deref().map(std::path::Path::new);
    let overrides = ConfigOverrides {
        host: cli.host.clone(),
        api_key: cli.api_key.clone(),
        index: cli.index.clone(),
        embedder: cli.embedder.clone(),
        timeout_ms: cli.timeout_ms,
    };
    let config = Config::load(config_file, &overrides).context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries the stdio protocol.
    let filter = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    match cli.command {
        Commands::ServeMcp {
            transport,
            bind,
            port,
        } => match transport {
            Transport::Stdio => commands::serve_mcp::run(&config)?,
            Transport::Http => commands::serve_mcp::run_http(&config, &bind, port)?,
        },
        Commands::Search {
            keywords,
            semantic_ratio,
            ranking_score_threshold,
            filterable_attribute,
            filter_word,
        } => {
            let args = commands::search::SearchArgs {
                keywords,
                semantic_ratio,
                ranking_score_threshold,
                filterable_attribute,
                filter_word,
            };
            commands::search::run(&config, &args)?;
        }
        Commands::Doctor => {
            commands::doctor::run(&config)?;
        }
    }

    Ok(())
}
