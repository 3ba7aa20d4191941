//! Configuration loading
//!
//! Bootstrap configuration comes from a TOML file. The file is located with
//! the following priority:
//! 1. Command-line argument (highest priority)
//! 2. `COURTSTATS_CONFIG` environment variable
//! 3. `<user config dir>/courtstats/config.toml`
//! 4. Built-in defaults (no file)
//!
//! `COURTSTATS_KB_URL` overrides the knowledge base endpoint from any source.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "COURTSTATS_CONFIG";

/// Environment variable overriding `knowledge_base.api_url`
pub const KB_URL_ENV_VAR: &str = "COURTSTATS_KB_URL";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Knowledge base client configuration (optional)
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Knowledge base (Wikidata action API) client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KnowledgeBaseConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Language for entity labels (given/family names)
    #[serde(default = "default_label_language")]
    pub label_language: String,

    /// Language used for the entity name search
    #[serde(default = "default_search_language")]
    pub search_language: String,

    /// Per-request transport timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First backoff wait; doubles after every wait
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Longest server-advised wait (Retry-After) that is honoured
    #[serde(default = "default_max_acceptable_wait_secs")]
    pub max_acceptable_wait_secs: u64,

    /// Client-side request throttle, unlimited when absent
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Claim cache bound, 0 = unbounded
    #[serde(default)]
    pub cache_max_entries: usize,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            label_language: default_label_language(),
            search_language: default_search_language(),
            request_timeout_secs: default_request_timeout_secs(),
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            max_acceptable_wait_secs: default_max_acceptable_wait_secs(),
            requests_per_second: None,
            cache_max_entries: 0,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_url() -> String {
    "https://www.wikidata.org/w/api.php".to_string()
}

fn default_user_agent() -> String {
    format!(
        "courtstats/{} (https://github.com/courtstats/courtstats)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_label_language() -> String {
    "es".to_string()
}

fn default_search_language() -> String {
    "en".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_backoff_ms() -> u64 {
    500
}

fn default_max_acceptable_wait_secs() -> u64 {
    10
}

impl TomlConfig {
    /// Reject values the enrichment pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let kb = &self.knowledge_base;

        if kb.api_url.trim().is_empty() {
            return Err(Error::Config("knowledge_base.api_url is empty".to_string()));
        }
        if kb.max_attempts == 0 {
            return Err(Error::Config(
                "knowledge_base.max_attempts must be at least 1".to_string(),
            ));
        }
        if kb.request_timeout_secs == 0 {
            return Err(Error::Config(
                "knowledge_base.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if kb.requests_per_second == Some(0) {
            return Err(Error::Config(
                "knowledge_base.requests_per_second must be positive when set".to_string(),
            ));
        }
        if kb.label_language.trim().is_empty() || kb.search_language.trim().is_empty() {
            return Err(Error::Config("knowledge_base languages must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Read and parse a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
}

/// Locate the configuration file, `None` when no source names an existing file
///
/// An explicitly named file (argument or environment) must exist.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Result<Option<PathBuf>> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return explicit_path(path.to_path_buf(), "command line");
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return explicit_path(PathBuf::from(path), CONFIG_ENV_VAR);
        }
    }

    // Priority 3: User config directory
    let user_config = dirs::config_dir().map(|d| d.join("courtstats").join("config.toml"));
    Ok(user_config.filter(|p| p.exists()))
}

fn explicit_path(path: PathBuf, source: &str) -> Result<Option<PathBuf>> {
    if path.exists() {
        Ok(Some(path))
    } else {
        Err(Error::Config(format!(
            "Config file from {} not found: {}",
            source,
            path.display()
        )))
    }
}

/// Resolve, load, apply environment overrides and validate
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let mut config = match resolve_config_path(cli_arg)? {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            load_toml_config(&path)?
        }
        None => {
            info!("No configuration file found, using built-in defaults");
            TomlConfig::default()
        }
    };

    if let Ok(url) = std::env::var(KB_URL_ENV_VAR) {
        if url.trim().is_empty() {
            warn!("{} is set but empty, ignored", KB_URL_ENV_VAR);
        } else {
            info!("Knowledge base URL overridden by {}", KB_URL_ENV_VAR);
            config.knowledge_base.api_url = url;
        }
    }

    config.validate()?;
    Ok(config)
}
