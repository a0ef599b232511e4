//! Cart configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use turbo_cache::FileStore;

use crate::error::CartError;

/// Storage key the cart is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "products";

/// What `add_to_cart` does when the product is already in the cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Append a second line item with quantity 1.
    #[default]
    AppendLine,
    /// Bump the quantity of the existing line item instead.
    MergeQuantity,
}

/// Cart configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key the serialized cart is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Behaviour of repeated adds of the same product.
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Location of the file-backed store, if one is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            duplicate_policy: DuplicatePolicy::default(),
            storage_path: None,
        }
    }
}

impl CartConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CartError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config = if is_json {
            let config: Self = serde_json::from_str(&content).map_err(|e| {
                CartError::Config(format!("Failed to parse JSON config {}: {}", path.display(), e))
            })?;
            config.validate()?;
            config
        } else {
            Self::from_toml_str(&content)?
        };

        tracing::debug!(path = %path.display(), "cart config loaded");
        Ok(config)
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CartError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the duplicate policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Set the file store location.
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Open the file-backed store named by `storage_path`.
    pub fn open_file_store(&self) -> Result<FileStore, CartError> {
        self.storage_path
            .as_ref()
            .map(FileStore::open)
            .ok_or_else(|| CartError::Config("storage_path is not set".to_string()))
    }

    fn validate(&self) -> Result<(), CartError> {
        if self.storage_key.trim().is_empty() {
            return Err(CartError::Config("storage_key must not be empty".to_string()));
        }
        Ok(())
    }
}
