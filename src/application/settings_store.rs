// Store trait for persisted settings
use crate::domain::settings::{AuthTable, StoredConfig};
use async_trait::async_trait;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Missing or unreadable documents read as empty.
    async fn load_config(&self) -> StoredConfig;

    async fn save_config(&self, config: &StoredConfig) -> anyhow::Result<()>;

    async fn load_auth(&self) -> AuthTable;

    async fn save_auth(&self, table: &AuthTable) -> anyhow::Result<()>;
}
