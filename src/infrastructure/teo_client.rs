// EdgeOne API client with TC3-HMAC-SHA256 request signing
use crate::application::metrics_repository::MetricsRepository;
use crate::infrastructure::config::TeoSettings;
use crate::infrastructure::credentials::{resolve_credentials, Credentials};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "teo";
const ALGORITHM: &str = "TC3-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";

#[derive(Debug, Clone)]
pub struct TeoClient {
    client: reqwest::Client,
    host: String,
    version: String,
    region: Option<String>,
    key_file: PathBuf,
}

impl TeoClient {
    pub fn new(settings: &TeoSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            host: settings.host.clone(),
            version: settings.version.clone(),
            region: settings.region.clone().filter(|r| !r.is_empty()),
            key_file: PathBuf::from(&settings.key_file),
        })
    }
}

#[async_trait]
impl MetricsRepository for TeoClient {
    async fn query(&self, action: &str, payload: &Value) -> Result<Value> {
        let credentials = resolve_credentials(&self.key_file).await?;
        let body = serde_json::to_string(payload)?;
        let timestamp = Utc::now().timestamp();
        let authorization = authorization_header(&credentials, &self.host, action, &body, timestamp)?;

        let mut request = self
            .client
            .post(format!("https://{}/", self.host))
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-TC-Action", action)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", &self.version)
            .body(body);
        if let Some(region) = &self.region {
            request = request.header("X-TC-Region", region);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {action} failed"))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {action} response"))?;

        if !status.is_success() && body.get("Response").is_none() {
            bail!("{action} returned HTTP {status}");
        }
        unwrap_response(body)
    }
}

/// Take the `Response` object out of an API reply; an `Error` inside it
/// becomes an error.
pub fn unwrap_response(mut body: Value) -> Result<Value> {
    let response = body
        .get_mut("Response")
        .map(Value::take)
        .context("Upstream reply has no Response object")?;

    if let Some(error) = response.get("Error") {
        let code = error.get("Code").and_then(Value::as_str).unwrap_or("Unknown");
        let message = error.get("Message").and_then(Value::as_str).unwrap_or_default();
        bail!("{code}: {message}");
    }
    Ok(response)
}

fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

fn hmac_sha256(key: &[u8], message: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| anyhow::anyhow!("Invalid HMAC key: {e}"))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn canonical_request(host: &str, action: &str, payload: &str) -> String {
    format!(
        "POST\n/\n\ncontent-type:{CONTENT_TYPE}\nhost:{host}\nx-tc-action:{}\n\n{SIGNED_HEADERS}\n{}",
        action.to_lowercase(),
        sha256_hex(payload)
    )
}

/// Value of the `Authorization` header for one request.
pub fn authorization_header(
    credentials: &Credentials,
    host: &str,
    action: &str,
    payload: &str,
    timestamp: i64,
) -> Result<String> {
    let date = DateTime::from_timestamp(timestamp, 0)
        .context("Timestamp out of range")?
        .format("%Y-%m-%d")
        .to_string();
    let scope = format!("{date}/{SERVICE}/tc3_request");

    let string_to_sign = format!(
        "{ALGORITHM}\n{timestamp}\n{scope}\n{}",
        sha256_hex(&canonical_request(host, action, payload))
    );

    let secret_date = hmac_sha256(format!("TC3{}", credentials.secret_key).as_bytes(), &date)?;
    let secret_service = hmac_sha256(&secret_date, SERVICE)?;
    let secret_signing = hmac_sha256(&secret_service, "tc3_request")?;
    let signature = hex::encode(hmac_sha256(&secret_signing, &string_to_sign)?);

    Ok(format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credentials.secret_id
    ))
}
