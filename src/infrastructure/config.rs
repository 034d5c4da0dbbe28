// Service configuration
use crate::domain::settings::SiteDefaults;
use anyhow::Context;
use chrono::FixedOffset;
use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub teo: TeoSettings,
    pub dashboard: DashboardSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
    /// Directory with the dashboard frontend, served at `/`.
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TeoSettings {
    pub host: String,
    pub version: String,
    pub region: Option<String>,
    pub timeout_secs: u64,
    /// Fallback credentials file when the environment has none.
    pub key_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub admin_password: String,
    pub site_name: Option<String>,
    pub background_url: Option<String>,
    pub fetch_concurrency: usize,
    /// Offset of the zone used for axis labels.
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub config_file: String,
    pub auth_file: String,
}

impl AppConfig {
    pub fn site_defaults(&self) -> SiteDefaults {
        SiteDefaults {
            site_name: self.dashboard.site_name.clone(),
            background_url: self.dashboard.background_url.clone(),
        }
    }

    pub fn display_offset(&self) -> anyhow::Result<FixedOffset> {
        FixedOffset::east_opt(self.dashboard.utc_offset_minutes * 60)
            .with_context(|| format!("Invalid utc_offset_minutes: {}", self.dashboard.utc_offset_minutes))
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    build_app_config(std::env::vars().collect())
}

/// Defaults, then `config/dashboard.*`, then `EDGE_MONITOR__*`, then the
/// plain `ADMIN_PASSWORD` / `SITE_NAME` / `CUSTOM_BACKGROUND_URL` variables.
fn build_app_config(env: HashMap<String, String>) -> anyhow::Result<AppConfig> {
    let legacy = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

    let settings = config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("teo.host", "teo.tencentcloudapi.com")?
        .set_default("teo.version", "2022-09-01")?
        .set_default("teo.timeout_secs", 30)?
        .set_default("teo.key_file", "key.txt")?
        .set_default("dashboard.admin_password", DEFAULT_ADMIN_PASSWORD)?
        .set_default("dashboard.fetch_concurrency", 6)?
        .set_default("dashboard.utc_offset_minutes", 480)?
        .set_default("storage.config_file", "config.json")?
        .set_default("storage.auth_file", "auth_ips.json")?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("EDGE_MONITOR")
                .prefix_separator("__")
                .separator("__")
                .source(Some(env.clone().into_iter().collect())),
        )
        .set_override_option("dashboard.admin_password", legacy("ADMIN_PASSWORD"))?
        .set_override_option("dashboard.site_name", legacy("SITE_NAME"))?
        .set_override_option("dashboard.background_url", legacy("CUSTOM_BACKGROUND_URL"))?
        .build()
        .context("Failed to load configuration")?;

    Ok(settings.try_deserialize()?)
}
