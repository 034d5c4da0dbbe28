// JSON file store for dashboard settings and the IP allowlist
use crate::application::settings_store::SettingsStore;
use crate::domain::settings::{AuthTable, StoredConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

/// Whole-file reads and writes; no locking between writers.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config_path: PathBuf,
    auth_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(config_path: impl Into<PathBuf>, auth_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            auth_path: auth_path.into(),
        }
    }
}

async fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            tracing::error!("Error reading {}: {}", path.display(), e);
            return T::default();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::error!("Error parsing {}: {}", path.display(), e);
        T::default()
    })
}

async fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn load_config(&self) -> StoredConfig {
        read_or_default(&self.config_path).await
    }

    async fn save_config(&self, config: &StoredConfig) -> Result<()> {
        write_pretty(&self.config_path, config).await
    }

    async fn load_auth(&self) -> AuthTable {
        read_or_default(&self.auth_path).await
    }

    async fn save_auth(&self, table: &AuthTable) -> Result<()> {
        write_pretty(&self.auth_path, table).await
    }
}
