//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::schema::SchemaVariant;

/// Main configuration for the invex pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvexConfig {
    /// Model endpoint configuration.
    pub model: ModelConfig,

    /// Invoice store configuration.
    pub store: StoreConfig,
}

/// Chat-completion endpoint and model selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    pub base_url: String,

    /// Bearer key sent with each request.
    pub api_key: String,

    /// Model identifier passed in the request body.
    pub name: String,

    /// Record shape requested from the model.
    pub schema_variant: SchemaVariant,

    /// Request timeout in seconds. `None` keeps the client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            api_key: "lm-studio".to_string(),
            name: "google/gemma-3-12b".to_string(),
            schema_variant: SchemaVariant::Basic,
            timeout_secs: None,
        }
    }
}

/// SQLite store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file path.
    pub database: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("invoices.db"),
        }
    }
}

impl InvexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Apply `INVEX_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> crate::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `INVEX_*` overrides using the given variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("INVEX_BASE_URL") {
            self.model.base_url = url;
        }
        if let Some(key) = lookup("INVEX_API_KEY") {
            self.model.api_key = key;
        }
        if let Some(name) = lookup("INVEX_MODEL") {
            self.model.name = name;
        }
        if let Some(variant) = lookup("INVEX_SCHEMA_VARIANT") {
            self.model.schema_variant = SchemaVariant::from_name(&variant).ok_or_else(|| {
                crate::InvexError::Config(format!("unknown schema variant: {}", variant))
            })?;
        }
        if let Some(database) = lookup("INVEX_DATABASE") {
            self.store.database = PathBuf::from(database);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"model": {"name": "qwen2.5-7b-instruct"}}"#).unwrap();

        let config = InvexConfig::from_file(&path).unwrap();
        assert_eq!(config.model.name, "qwen2.5-7b-instruct");
        assert_eq!(config.model.base_url, "http://localhost:1234/v1");
        assert_eq!(config.store.database, PathBuf::from("invoices.db"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = InvexConfig::default();
        config.model.schema_variant = SchemaVariant::Extended;
        config.model.timeout_secs = Some(90);

        config.save(&path).unwrap();
        assert_eq!(InvexConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("INVEX_MODEL", "llama-3.1-8b"),
            ("INVEX_SCHEMA_VARIANT", "extended"),
            ("INVEX_DATABASE", "/tmp/out.db"),
        ]);
        let mut config = InvexConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.model.name, "llama-3.1-8b");
        assert_eq!(config.model.schema_variant, SchemaVariant::Extended);
        assert_eq!(config.store.database, PathBuf::from("/tmp/out.db"));
        assert_eq!(config.model.api_key, "lm-studio");
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let mut config = InvexConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "INVEX_SCHEMA_VARIANT").then(|| "everything".to_string())
        });
        assert!(matches!(result, Err(crate::InvexError::Config(_))));
    }
}
