//! Mapper configuration
//!
//! Loaded once at startup from YAML or JSON, then used to open the repository
//! and construct the persistence engine.
//!
//! ```yaml
//! repository:
//!   storage: memory
//!   name: people
//! count_language: sparql11
//! subject_prefix: p-
//! ```

use crate::rdf::RdfStore;
use crate::sparql::QueryLanguage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No repository backend available for this storage name
    #[error("Unsupported storage: {0}")]
    UnsupportedStorage(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Storage names served by the in-memory store
pub const MEMORY_STORAGES: &[&str] = &["memory", "hashes"];

/// `database.yml`-style keys and the repository option each one becomes
const DATABASE_KEY_MAPPING: &[(&str, &str)] = &[("adapter", "storage"), ("database", "name")];

/// Top-level mapper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Repository to open
    pub repository: RepositoryOptions,
    /// Dialect requested for `COUNT` queries
    pub count_language: QueryLanguage,
    /// Prepended to generated subject fragments
    pub subject_prefix: Option<String>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            repository: RepositoryOptions::default(),
            count_language: QueryLanguage::Sparql11,
            subject_prefix: None,
        }
    }
}

impl MapperConfig {
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a YAML file (JSON is accepted too, being a YAML subset)
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        info!("Loading mapper configuration from {:?}", path.as_ref());
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Options for opening a statement repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryOptions {
    /// Backend name
    #[serde(default = "default_storage")]
    pub storage: String,
    /// Repository name within the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Backend-specific options, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_storage() -> String {
    "memory".to_string()
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            name: None,
            extra: BTreeMap::new(),
        }
    }
}

impl RepositoryOptions {
    /// Options from a Rails-style `database.yml` entry
    ///
    /// `adapter` becomes `storage` and `database` becomes `name`; the
    /// `sqlite3` adapter is called `sqlite` here. Other keys pass through.
    pub fn from_database_config(
        config: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> ConfigResult<Self> {
        let mut remapped = serde_json::Map::new();
        for (key, value) in config {
            let key = DATABASE_KEY_MAPPING
                .iter()
                .find(|(from, _)| *from == key)
                .map_or(key.clone(), |(_, to)| to.to_string());
            remapped.insert(key, value);
        }
        if let Some(storage) = remapped.get_mut("storage") {
            if storage.as_str() == Some("sqlite3") {
                *storage = serde_json::Value::from("sqlite");
            }
        }
        Ok(serde_json::from_value(serde_json::Value::Object(remapped))?)
    }

    /// [`from_database_config`](Self::from_database_config) over a YAML mapping
    pub fn from_database_yaml(content: &str) -> ConfigResult<Self> {
        let config: BTreeMap<String, serde_json::Value> = serde_yaml::from_str(content)?;
        Self::from_database_config(config)
    }

    pub fn is_memory(&self) -> bool {
        MEMORY_STORAGES.contains(&self.storage.as_str())
    }
}

/// Open the repository described by `options`
pub fn open_repository(options: &RepositoryOptions) -> ConfigResult<RdfStore> {
    if !options.is_memory() {
        return Err(ConfigError::UnsupportedStorage(options.storage.clone()));
    }
    info!(
        storage = options.storage.as_str(),
        name = options.name.as_deref().unwrap_or("default"),
        "Opening in-memory repository"
    );
    Ok(RdfStore::new())
}
