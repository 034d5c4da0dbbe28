// Traffic service - Classifies a metric and forwards it upstream
use crate::application::metrics_repository::MetricsRepository;
use crate::domain::catalog::QueryShape;
use crate::domain::time_range::{format_upstream, TimeWindow};
use serde_json::{json, Value};
use std::sync::Arc;

pub const DEFAULT_METRIC: &str = "l7Flow_flux";

/// Granularities the upstream accepts; anything else is left to its default.
const FORWARDED_INTERVALS: [&str; 4] = ["min", "5min", "hour", "day"];

/// One upstream call, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRequest {
    pub metric: String,
    pub shape: QueryShape,
    pub payload: Value,
}

impl MetricRequest {
    pub fn build(metric: &str, window: &TimeWindow, interval: Option<&str>) -> Self {
        let shape = QueryShape::classify(metric);
        let start = format_upstream(&window.start);
        let end = format_upstream(&window.end);

        let payload = match shape {
            QueryShape::TopAnalysis => json!({
                "StartTime": start,
                "EndTime": end,
                "MetricName": metric,
                "ZoneIds": ["*"],
            }),
            QueryShape::OriginPullTiming | QueryShape::Timing => {
                let mut payload = json!({
                    "StartTime": start,
                    "EndTime": end,
                    "MetricNames": [metric],
                    "ZoneIds": ["*"],
                });
                if let Some(interval) = interval.filter(|i| FORWARDED_INTERVALS.contains(i)) {
                    payload["Interval"] = json!(interval);
                }
                payload
            }
        };

        Self {
            metric: metric.to_string(),
            shape,
            payload,
        }
    }
}

#[derive(Clone)]
pub struct TrafficService {
    repository: Arc<dyn MetricsRepository>,
}

impl TrafficService {
    pub fn new(repository: Arc<dyn MetricsRepository>) -> Self {
        Self { repository }
    }

    /// Fetch one metric and return the upstream response unmodified.
    pub async fn fetch(&self, metric: &str, window: &TimeWindow, interval: Option<&str>) -> anyhow::Result<Value> {
        let request = MetricRequest::build(metric, window, interval);
        self.send(&request).await
    }

    pub async fn send(&self, request: &MetricRequest) -> anyhow::Result<Value> {
        tracing::debug!(
            "Querying {} via {}",
            request.metric,
            request.shape.action()
        );
        self.repository.query(request.shape.action(), &request.payload).await
    }
}
