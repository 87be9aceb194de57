//! Application configuration for Pure Extracts.
//!
//! User config lives at `~/.pureextracts/pureextracts.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PureExtractsError, Result};
use crate::types::DEFAULT_SLOT_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pureextracts.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pureextracts";

// ---------------------------------------------------------------------------
// Config structs (matching pureextracts.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the catalog slot lives.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog store behavior.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Workflow-automation webhook endpoints.
    #[serde(default)]
    pub webhooks: WebhookConfig,
}

/// `[storage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// libSQL database file; a leading `~/` expands to the home directory.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Key of the slot holding the serialized product list.
    #[serde(default = "default_slot_key")]
    pub slot_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            slot_key: default_slot_key(),
        }
    }
}

fn default_database_path() -> String {
    format!("~/{CONFIG_DIR_NAME}/catalog.db")
}
fn default_slot_key() -> String {
    DEFAULT_SLOT_KEY.into()
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Write `[]` when a mutation empties the catalog. When false the slot
    /// keeps its last non-empty value and the records come back on reload.
    #[serde(default)]
    pub persist_empty: bool,

    /// Fall back to the seed set when the slot holds unreadable data.
    #[serde(default = "default_true")]
    pub recover_corrupt: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            persist_empty: false,
            recover_corrupt: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// `[webhooks]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Chat assistant workflow.
    #[serde(default = "default_chat_url")]
    pub chat_url: String,

    /// Contact / feedback form workflow.
    #[serde(default = "default_contact_url")]
    pub contact_url: String,

    /// Product-description grammar workflow.
    #[serde(default = "default_grammar_url")]
    pub grammar_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            chat_url: default_chat_url(),
            contact_url: default_contact_url(),
            grammar_url: default_grammar_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_chat_url() -> String {
    "https://prasad18.app.n8n.cloud/webhook/chat-bot".into()
}
fn default_contact_url() -> String {
    "https://prasad18.app.n8n.cloud/webhook/feedback".into()
}
fn default_grammar_url() -> String {
    "https://techi69.app.n8n.cloud/webhook-test/form".into()
}
fn default_timeout_secs() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Webhook endpoints (runtime, validated)
// ---------------------------------------------------------------------------

/// Parsed webhook endpoints, ready for the HTTP client.
#[derive(Debug, Clone)]
pub struct WebhookEndpoints {
    pub chat: Url,
    pub contact: Url,
    pub grammar: Url,
    pub timeout_secs: u64,
}

impl TryFrom<&WebhookConfig> for WebhookEndpoints {
    type Error = PureExtractsError;

    fn try_from(config: &WebhookConfig) -> Result<Self> {
        Ok(Self {
            chat: parse_endpoint("chat_url", &config.chat_url)?,
            contact: parse_endpoint("contact_url", &config.contact_url)?,
            grammar: parse_endpoint("grammar_url", &config.grammar_url)?,
            timeout_secs: config.timeout_secs,
        })
    }
}

fn parse_endpoint(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| PureExtractsError::config(format!("webhooks.{field} '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PureExtractsError::config(format!(
            "webhooks.{field}: unsupported scheme '{other}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pureextracts/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PureExtractsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pureextracts/pureextracts.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PureExtractsError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PureExtractsError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PureExtractsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PureExtractsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PureExtractsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Resolve a configured path, expanding a leading `~/`.
pub fn expand_home(raw: &str) -> Result<PathBuf> {
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir()
                .ok_or_else(|| PureExtractsError::config("could not determine home directory"))?;
            Ok(home.join(rest))
        }
        None if raw == "~" => dirs::home_dir()
            .ok_or_else(|| PureExtractsError::config("could not determine home directory")),
        None => Ok(PathBuf::from(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("database_path"));
        assert!(toml_str.contains("organic-products"));
        assert!(toml_str.contains("chat-bot"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.storage.slot_key, "organic-products");
        assert!(!parsed.catalog.persist_empty);
        assert!(parsed.catalog.recover_corrupt);
        assert_eq!(parsed.webhooks.timeout_secs, 30);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[catalog]
persist_empty = true

[webhooks]
chat_url = "http://localhost:5678/webhook/chat"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(config.catalog.persist_empty);
        assert!(config.catalog.recover_corrupt);
        assert_eq!(config.webhooks.chat_url, "http://localhost:5678/webhook/chat");
        assert_eq!(config.webhooks.grammar_url, default_grammar_url());
        assert_eq!(config.storage.slot_key, DEFAULT_SLOT_KEY);
    }

    #[test]
    fn endpoints_from_default_config() {
        let endpoints = WebhookEndpoints::try_from(&WebhookConfig::default()).expect("valid");
        assert_eq!(endpoints.chat.host_str(), Some("prasad18.app.n8n.cloud"));
        assert_eq!(endpoints.grammar.path(), "/webhook-test/form");
    }

    #[test]
    fn endpoint_validation_rejects_garbage() {
        let mut config = WebhookConfig::default();
        config.contact_url = "not a url".into();
        let err = WebhookEndpoints::try_from(&config).unwrap_err();
        assert!(err.to_string().contains("contact_url"));

        let mut config = WebhookConfig::default();
        config.chat_url = "ftp://example.com/chat".into();
        let err = WebhookEndpoints::try_from(&config).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        assert_eq!(
            expand_home("/var/lib/catalog.db").unwrap(),
            PathBuf::from("/var/lib/catalog.db")
        );
        assert_eq!(expand_home("catalog.db").unwrap(), PathBuf::from("catalog.db"));
    }

    #[test]
    fn load_config_from_reports_parse_failures() {
        let path = std::env::temp_dir().join(format!(
            "pe_bad_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[catalog\npersist_empty = ").expect("write temp config");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
        let _ = std::fs::remove_file(&path);
    }
}
