// Settings service - Dashboard customization and IP authorization
use crate::application::settings_store::SettingsStore;
use crate::domain::settings::{
    admin_token, bearer_matches, ConfigPatch, DashboardConfig, SettingsError, SiteDefaults, StoredConfig,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Invalid(#[from] SettingsError),
    #[error("Failed to save config")]
    Save(#[source] anyhow::Error),
}

#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    admin_password: String,
    defaults: SiteDefaults,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>, admin_password: String, defaults: SiteDefaults) -> Self {
        Self {
            store,
            admin_password,
            defaults,
        }
    }

    pub async fn get_config(&self, client_ip: &str) -> DashboardConfig {
        let stored = self.store.load_config().await;
        let authorized = self.is_ip_authorized(client_ip).await;
        DashboardConfig::resolve(&stored, &self.defaults, authorized)
    }

    /// Site name as shown in the dashboard title.
    pub async fn site_name(&self) -> String {
        let stored = self.store.load_config().await;
        DashboardConfig::resolve(&stored, &self.defaults, false).site_name
    }

    pub async fn is_ip_authorized(&self, client_ip: &str) -> bool {
        self.store.load_auth().await.is_authorized(client_ip, Utc::now())
    }

    /// Returns the bearer token on success and records the IP.
    pub async fn login(&self, client_ip: &str, password: &str) -> Option<String> {
        if password != self.admin_password {
            tracing::warn!("Failed login from {}", client_ip);
            return None;
        }

        let now = Utc::now();
        let mut table = self.store.load_auth().await;
        let pruned = table.prune(now);
        table.grant(client_ip, now);
        if let Err(e) = self.store.save_auth(&table).await {
            tracing::error!("Error saving authorized IPs: {:#}", e);
        }

        tracing::info!("Authorized {} ({} expired entries pruned)", client_ip, pruned);
        Some(admin_token(password))
    }

    pub async fn logout(&self, client_ip: &str) {
        let mut table = self.store.load_auth().await;
        table.revoke(client_ip);
        if let Err(e) = self.store.save_auth(&table).await {
            tracing::error!("Error saving authorized IPs: {:#}", e);
        }
    }

    /// Authorize, validate the whole body, then write once.
    ///
    /// `body` is `None` when the request carried no parsable JSON; that is
    /// only reported after the caller has been authorized.
    pub async fn update_config(
        &self,
        client_ip: &str,
        authorization: Option<&str>,
        body: Option<&Value>,
    ) -> Result<StoredConfig, UpdateError> {
        let token_valid = bearer_matches(authorization, &self.admin_password);
        if !token_valid && !self.is_ip_authorized(client_ip).await {
            return Err(UpdateError::Unauthorized);
        }

        let body = body.ok_or(SettingsError::InvalidBody)?;
        let patch = ConfigPatch::from_json(body)?;
        let mut config = self.store.load_config().await;
        patch.apply(&mut config);

        self.store.save_config(&config).await.map_err(UpdateError::Save)?;
        tracing::info!("Dashboard config updated by {}", client_ip);
        Ok(config)
    }
}
