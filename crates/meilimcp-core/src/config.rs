use crate::constants;
use crate::error::{ConfigError, QueryError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_HOST: &str = "MEILI_HOST";
pub const ENV_API_KEY: &str = "MEILI_API_KEY";
pub const ENV_INDEX: &str = "MEILI_INDEX";
pub const ENV_EMBEDDER: &str = "MEILI_EMBEDDER";
pub const ENV_TIMEOUT_MS: &str = "MEILIMCP_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "MEILIMCP_LOG_LEVEL";
pub const ENV_FILTERABLE_ATTRIBUTES: &str = "MEILIMCP_FILTERABLE_ATTRIBUTES";
pub const ENV_STRICT_FILTER_ATTRIBUTES: &str = "MEILIMCP_STRICT_FILTER_ATTRIBUTES";

/// Layered configuration as read from files and the environment.
///
/// Values are optional here; [`EngineConfig::from_config`] turns this into the
/// validated snapshot the rest of the process uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub meilisearch: MeilisearchConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Problems found while loading that were recovered from. Collected here
    /// because loading runs before the log subscriber exists.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeilisearchConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub embedder: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Static filterable attribute list. When set, index settings are not fetched at startup.
    #[serde(default)]
    pub filterable_attributes: Option<Vec<String>>,
    /// Reject filters on attributes the index does not declare as filterable.
    #[serde(default)]
    pub strict_filter_attributes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for MeilisearchConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_key: None,
            index: None,
            embedder: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    constants::DEFAULT_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line. These win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub api_key: Option<String>,
    pub index: Option<String>,
    pub embedder: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl Config {
    /// Load configuration with layered precedence:
    /// 1. Command-line flags (highest priority)
    /// 2. Environment variables (`MEILI_*`, `MEILIMCP_*`)
    /// 3. Explicit config file (from `--config`)
    /// 4. Global config: `~/.meilimcp/config.toml`
    /// 5. Built-in defaults (lowest priority)
    pub fn load(
        config_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        Self::load_with_env(
            dirs::home_dir().as_deref(),
            config_file,
            overrides,
            |key| std::env::var(key).ok(),
        )
    }

    /// Same as [`Config::load`] with an injectable home directory and
    /// environment lookup. `home = None` skips the global config file.
    pub fn load_with_env<F>(
        home: Option<&Path>,
        config_file: Option<&Path>,
        overrides: &ConfigOverrides,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merged = toml::Value::Table(toml::map::Map::new());

        if let Some(home) = home {
            let global_path = home
                .join(constants::DEFAULT_DATA_DIR)
                .join(constants::GLOBAL_CONFIG_FILE);
            if global_path.exists() {
                let raw = load_toml_value(&global_path)?;
                merge_toml_values(&mut merged, &raw);
            }
        }

        if let Some(cf) = config_file {
            if !cf.exists() {
                return Err(ConfigError::InvalidValue {
                    field: "--config".to_string(),
                    reason: format!("config file not found: {}", cf.display()),
                });
            }
            let raw = load_toml_value(cf)?;
            merge_toml_values(&mut merged, &raw);
        }

        let config_str =
            toml::to_string(&merged).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let mut config: Config =
            toml::from_str(&config_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        apply_env_overrides(&mut config, &env);
        apply_flag_overrides(&mut config, overrides);
        config.normalize();

        Ok(config)
    }

    fn normalize(&mut self) {
        let ms = &mut self.meilisearch;
        ms.host = non_blank(ms.host.take()).map(|h| h.trim_end_matches('/').to_string());
        ms.api_key = non_blank(ms.api_key.take());
        ms.index = non_blank(ms.index.take());
        ms.embedder = non_blank(ms.embedder.take());
        if ms.timeout_ms == 0 {
            self.warnings.push(format!(
                "meilisearch.timeout_ms must be positive; using default {}",
                constants::DEFAULT_TIMEOUT_MS
            ));
            ms.timeout_ms = constants::DEFAULT_TIMEOUT_MS;
        }
        if let Some(attrs) = self.index.filterable_attributes.take() {
            let cleaned: Vec<String> = attrs
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
            self.index.filterable_attributes = Some(cleaned);
        }
    }
}

/// Load a TOML file as a raw `toml::Value` (preserving only explicitly-set fields).
fn load_toml_value(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<toml::Value>()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Deep-merge `overlay` into `base`. Only keys present in `overlay` are written.
fn merge_toml_values(base: &mut toml::Value, overlay: &toml::Value) {
    if let (toml::Value::Table(base_map), toml::Value::Table(overlay_map)) = (base, overlay) {
        for (key, overlay_val) in overlay_map {
            if let Some(base_val) = base_map.get_mut(key) {
                if base_val.is_table() && overlay_val.is_table() {
                    merge_toml_values(base_val, overlay_val);
                } else {
                    *base_val = overlay_val.clone();
                }
            } else {
                base_map.insert(key.clone(), overlay_val.clone());
            }
        }
    }
}

/// Apply environment variable overrides to config fields.
/// Empty values are ignored, matching the flag-then-env fallback.
fn apply_env_overrides<F>(config: &mut Config, env: &F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_HOST) {
        config.meilisearch.host = Some(v);
    }
    if let Some(v) = get(ENV_API_KEY) {
        config.meilisearch.api_key = Some(v);
    }
    if let Some(v) = get(ENV_INDEX) {
        config.meilisearch.index = Some(v);
    }
    if let Some(v) = get(ENV_EMBEDDER) {
        config.meilisearch.embedder = Some(v);
    }
    if let Some(v) = get(ENV_TIMEOUT_MS) {
        match v.trim().parse() {
            Ok(n) => config.meilisearch.timeout_ms = n,
            Err(_) => config
                .warnings
                .push(format!("ignoring unparseable {ENV_TIMEOUT_MS}={v}")),
        }
    }
    if let Some(v) = get(ENV_LOG_LEVEL) {
        config.logging.level = v;
    }
    if let Some(v) = get(ENV_FILTERABLE_ATTRIBUTES) {
        config.index.filterable_attributes = Some(parse_csv_list(&v));
    }
    if let Some(v) = get(ENV_STRICT_FILTER_ATTRIBUTES) {
        match parse_bool(&v) {
            Some(b) => config.index.strict_filter_attributes = b,
            None => config
                .warnings
                .push(format!("ignoring unparseable {ENV_STRICT_FILTER_ATTRIBUTES}={v}")),
        }
    }
}

fn apply_flag_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    let pick = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

    if let Some(v) = pick(&overrides.host) {
        config.meilisearch.host = Some(v);
    }
    if let Some(v) = pick(&overrides.api_key) {
        config.meilisearch.api_key = Some(v);
    }
    if let Some(v) = pick(&overrides.index) {
        config.meilisearch.index = Some(v);
    }
    if let Some(v) = pick(&overrides.embedder) {
        config.meilisearch.embedder = Some(v);
    }
    if let Some(n) = overrides.timeout_ms {
        config.meilisearch.timeout_ms = n;
    }
}

fn parse_csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Immutable configuration snapshot built once at startup and passed
/// explicitly to the query builder and the transports.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub host: String,
    pub api_key: Option<String>,
    pub index: String,
    pub embedder: Option<String>,
    pub timeout_ms: u64,
    pub filterable_attributes: Option<Vec<String>>,
    pub strict_filter_attributes: bool,
}

impl EngineConfig {
    /// Resolve the startup-required values. Missing host or index is fatal;
    /// a missing embedder only fails individual search calls.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let host = config
            .meilisearch
            .host
            .clone()
            .ok_or(ConfigError::MissingValue {
                key: "Meilisearch host",
                flag: "--host",
                env: ENV_HOST,
            })?;
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "meilisearch.host".to_string(),
                reason: format!("expected an http:// or https:// URL, got '{host}'"),
            });
        }
        let index = config
            .meilisearch
            .index
            .clone()
            .ok_or(ConfigError::MissingValue {
                key: "Meilisearch index",
                flag: "--index",
                env: ENV_INDEX,
            })?;

        Ok(Self {
            host,
            api_key: config.meilisearch.api_key.clone(),
            index,
            embedder: config.meilisearch.embedder.clone(),
            timeout_ms: config.meilisearch.timeout_ms,
            filterable_attributes: config.index.filterable_attributes.clone(),
            strict_filter_attributes: config.index.strict_filter_attributes,
        })
    }

    /// Embedder to send with hybrid requests, or the per-call configuration error.
    pub fn require_embedder(&self) -> Result<&str, QueryError> {
        self.embedder
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(QueryError::MissingConfiguration {
                key: "embedder",
                flag: "--embedder",
                env: ENV_EMBEDDER,
            })
    }

    /// API key with everything but a short prefix hidden, for diagnostics.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(mask_secret)
    }
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
