// Dashboard customization and the IP allowlist
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DEFAULT_SITE_NAME: &str = "EdgeOne 监控大屏";

/// How long a successful login keeps an IP authorized.
pub const LOGIN_GRANT_DAYS: i64 = 7;

/// Persisted customization. Keys this service does not know are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_background_image: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friend_links: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fallbacks used when the stored config leaves a field empty.
#[derive(Debug, Clone, Default)]
pub struct SiteDefaults {
    pub site_name: Option<String>,
    pub background_url: Option<String>,
}

/// Effective config as served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub site_name: String,
    pub background_image: String,
    pub use_background_image: bool,
    pub card_opacity: f64,
    pub friend_links: Vec<Value>,
    pub is_authorized: bool,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

impl DashboardConfig {
    pub fn resolve(stored: &StoredConfig, defaults: &SiteDefaults, is_authorized: bool) -> Self {
        Self {
            site_name: non_empty(stored.site_name.as_ref())
                .or_else(|| non_empty(defaults.site_name.as_ref()))
                .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            background_image: non_empty(stored.background_image.as_ref())
                .or_else(|| non_empty(defaults.background_url.as_ref()))
                .unwrap_or_default(),
            use_background_image: stored.use_background_image != Some(false),
            card_opacity: stored.card_opacity.unwrap_or(1.0),
            friend_links: stored.friend_links.clone().unwrap_or_default(),
            is_authorized,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Invalid {0} format")]
    InvalidField(&'static str),
}

/// Validated partial update. Absent fields leave the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub background_image: Option<String>,
    pub use_background_image: Option<bool>,
    pub card_opacity: Option<f64>,
    pub friend_links: Option<Vec<Value>>,
}

impl ConfigPatch {
    /// Validate every field of a request body before anything is written.
    pub fn from_json(body: &Value) -> Result<Self, SettingsError> {
        let body = body.as_object().ok_or(SettingsError::InvalidBody)?;
        let mut patch = ConfigPatch::default();

        if let Some(value) = body.get("useBackgroundImage") {
            let flag = value
                .as_bool()
                .ok_or(SettingsError::InvalidField("useBackgroundImage"))?;
            patch.use_background_image = Some(flag);
        }

        if let Some(value) = body.get("backgroundImage") {
            let url = value
                .as_str()
                .ok_or(SettingsError::InvalidField("backgroundImage"))?;
            patch.background_image = Some(url.to_string());
        }

        if let Some(value) = body.get("cardOpacity") {
            let opacity = parse_opacity(value).ok_or(SettingsError::InvalidField("cardOpacity"))?;
            patch.card_opacity = Some(opacity);
        }

        if let Some(value) = body.get("friendLinks") {
            let links = value
                .as_array()
                .ok_or(SettingsError::InvalidField("friendLinks"))?;
            patch.friend_links = Some(links.clone());
        }

        Ok(patch)
    }

    pub fn apply(self, config: &mut StoredConfig) {
        if let Some(flag) = self.use_background_image {
            config.use_background_image = Some(flag);
        }
        if let Some(url) = self.background_image {
            config.background_image = Some(url);
        }
        if let Some(opacity) = self.card_opacity {
            config.card_opacity = Some(opacity);
        }
        if let Some(links) = self.friend_links {
            config.friend_links = Some(links);
        }
    }
}

/// A number, or a string holding one, within `[0, 1]`.
fn parse_opacity(value: &Value) -> Option<f64> {
    let opacity = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (opacity.is_finite() && (0.0..=1.0).contains(&opacity)).then_some(opacity)
}

/// Client IP -> expiry in epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthTable(BTreeMap<String, i64>);

impl AuthTable {
    pub fn grant(&mut self, ip: &str, now: DateTime<Utc>) {
        let expiry = now + Duration::days(LOGIN_GRANT_DAYS);
        self.0.insert(ip.to_string(), expiry.timestamp_millis());
    }

    pub fn revoke(&mut self, ip: &str) -> bool {
        self.0.remove(ip).is_some()
    }

    pub fn is_authorized(&self, ip: &str, now: DateTime<Utc>) -> bool {
        self.0
            .get(ip)
            .is_some_and(|expiry| *expiry > now.timestamp_millis())
    }

    /// Drop expired entries; returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.0.len();
        let now = now.timestamp_millis();
        self.0.retain(|_, expiry| *expiry > now);
        before - self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Bearer token handed out on login.
pub fn admin_token(password: &str) -> String {
    STANDARD.encode(password.as_bytes())
}

pub fn bearer_matches(authorization: Option<&str>, password: &str) -> bool {
    authorization.is_some_and(|header| header == format!("Bearer {}", admin_token(password)))
}
