// Repository trait for the upstream statistics API
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// Call one API action and return the unwrapped `Response` object.
    async fn query(&self, action: &str, payload: &Value) -> anyhow::Result<Value>;
}
