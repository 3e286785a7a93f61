//! Client configuration
//!
//! A JSON file or the environment names the engine endpoint and an optional
//! prefix put in front of every index name, so several deployments can share
//! one cluster.
//!
//! ```json
//! { "url": "https://search.internal:9200", "index_prefix": "staging_" }
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::Schema;

pub const URL_ENV: &str = "DOCQUERY_URL";
pub const INDEX_PREFIX_ENV: &str = "DOCQUERY_INDEX_PREFIX";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid url '{0}': expected http:// or https://")]
    InvalidUrl(String),

    #[error("Invalid index_prefix '{0}': must be lowercase without '*', ',' or whitespace")]
    InvalidIndexPrefix(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "DOCQUERY_CONFIG_READ",
            ConfigError::Parse(_) => "DOCQUERY_CONFIG_PARSE",
            ConfigError::InvalidUrl(_) => "DOCQUERY_CONFIG_INVALID_URL",
            ConfigError::InvalidIndexPrefix(_) => "DOCQUERY_CONFIG_INVALID_PREFIX",
        }
    }
}

/// Connection settings for a search engine client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Engine base url
    #[serde(default = "default_url")]
    pub url: String,

    /// Prepended to every schema's index name
    #[serde(default)]
    pub index_prefix: String,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            index_prefix: String::new(),
        }
    }
}

impl ClientConfig {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            index_prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Loads and validates a JSON config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: ClientConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `DOCQUERY_URL` and `DOCQUERY_INDEX_PREFIX`
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();
        if let Ok(url) = env::var(URL_ENV) {
            config.url = url;
        }
        if let Ok(prefix) = env::var(INDEX_PREFIX_ENV) {
            config.index_prefix = prefix;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.url.clone()));
        }

        let prefix = &self.index_prefix;
        let bad_char = prefix.chars().any(|c| c == '*' || c == ',' || c.is_whitespace());
        if bad_char || prefix.to_lowercase() != *prefix {
            return Err(ConfigError::InvalidIndexPrefix(prefix.clone()));
        }

        Ok(())
    }

    /// Fully resolved index for a schema
    pub fn index_name(&self, schema: &Schema) -> String {
        format!("{}{}", self.index_prefix, schema.index_name())
    }

    pub fn uses_tls(&self) -> bool {
        self.url.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.url, "http://localhost:9200");
        assert_eq!(config.index_prefix, "");
        assert!(!config.uses_tls());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("client.json");
        fs::write(&path, r#"{"index_prefix": "test_"}"#).unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.url, "http://localhost:9200");
        assert_eq!(config.index_prefix, "test_");
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = ClientConfig::load(&tmp.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), "DOCQUERY_CONFIG_READ");
    }

    #[test]
    fn test_load_bad_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("client.json");
        fs::write(&path, "{url:").unwrap();
        assert_eq!(ClientConfig::load(&path).unwrap_err().code(), "DOCQUERY_CONFIG_PARSE");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = ClientConfig {
            url: "localhost:9200".into(),
            ..ClientConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidUrl("localhost:9200".into())));
    }

    #[test]
    fn test_rejects_bad_prefixes() {
        for prefix in ["Test_", "a*", "a,b", "a b"] {
            let err = ClientConfig::with_prefix(prefix).validate().unwrap_err();
            assert_eq!(err.code(), "DOCQUERY_CONFIG_INVALID_PREFIX", "prefix {:?}", prefix);
        }
    }

    #[test]
    fn test_index_name_with_prefix() {
        let schema = Schema::new("UserProfile");
        assert_eq!(ClientConfig::with_prefix("qa_").index_name(&schema), "qa_userprofile");
        assert_eq!(ClientConfig::default().index_name(&schema.with_index("people")), "people");
    }

    #[test]
    fn test_tls_detection() {
        let config = ClientConfig {
            url: "https://search:9200".into(),
            ..ClientConfig::default()
        };
        assert!(config.uses_tls());
    }
}
