// Metric samples - normalized view of the upstream statistics payloads
use super::catalog::QueryShape;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const TIME_LABEL_FORMAT: &str = "%m-%d %H:%M";

/// A time series with index-aligned labels and values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    time_data: Vec<String>,
    value_data: Vec<f64>,
    pub sum: f64,
    pub max: f64,
    pub avg: f64,
}

impl TimeSeries {
    pub fn from_points<I>(points: I, sum: f64, max: f64, avg: f64) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let (time_data, value_data) = points.into_iter().unzip();
        Self {
            time_data,
            value_data,
            sum,
            max,
            avg,
        }
    }

    /// Build from bare values, deriving the aggregates locally.
    pub fn from_values<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut series = Self::from_points(points, 0.0, 0.0, 0.0);
        let finite: Vec<f64> = series.value_data.iter().copied().filter(|v| v.is_finite()).collect();
        series.sum = finite.iter().sum();
        series.max = finite.iter().copied().fold(0.0, f64::max);
        series.avg = if finite.is_empty() {
            0.0
        } else {
            series.sum / finite.len() as f64
        };
        series
    }

    pub fn time_data(&self) -> &[String] {
        &self.time_data
    }

    pub fn value_data(&self) -> &[f64] {
        &self.value_data
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopEntry {
    pub key: String,
    pub value: f64,
}

impl TopEntry {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MetricSample {
    Time(TimeSeries),
    Top { data: Vec<TopEntry> },
}

/// Samples for one dashboard refresh, keyed by metric name.
#[derive(Debug, Clone, Default)]
pub struct MetricResults {
    samples: HashMap<String, MetricSample>,
}

impl MetricResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: impl Into<String>, sample: MetricSample) {
        self.samples.insert(metric.into(), sample);
    }

    /// The metric's series, if present and time-shaped.
    pub fn time(&self, metric: &str) -> Option<&TimeSeries> {
        match self.samples.get(metric) {
            Some(MetricSample::Time(series)) => Some(series),
            _ => None,
        }
    }

    /// The metric's entries, if present and top-shaped.
    pub fn top(&self, metric: &str) -> Option<&[TopEntry]> {
        match self.samples.get(metric) {
            Some(MetricSample::Top { data }) => Some(data),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UpstreamPayload {
    #[serde(default)]
    data: Vec<UpstreamRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UpstreamRecord {
    #[serde(default)]
    type_value: Vec<TimingTypeValue>,
    #[serde(default)]
    detail_data: Vec<UpstreamTopDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TimingTypeValue {
    #[serde(default)]
    metric_name: String,
    #[serde(default)]
    sum: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    avg: Option<f64>,
    #[serde(default)]
    detail: Vec<TimingPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TimingPoint {
    timestamp: i64,
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UpstreamTopDetail {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: Option<f64>,
}

/// Convert one upstream response into a sample.
///
/// Returns `None` when the payload does not have the expected shape or does
/// not mention the metric; callers treat that as "no data".
pub fn normalize(
    metric: &str,
    shape: QueryShape,
    payload: &serde_json::Value,
    offset: FixedOffset,
) -> Option<MetricSample> {
    let parsed: UpstreamPayload = match serde_json::from_value(payload.clone()) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Unexpected payload shape for {}: {}", metric, e);
            return None;
        }
    };

    match shape {
        QueryShape::TopAnalysis => {
            let data = parsed
                .data
                .into_iter()
                .flat_map(|record| record.detail_data)
                .map(|d| TopEntry::new(d.key, d.value.unwrap_or(0.0)))
                .collect();
            Some(MetricSample::Top { data })
        }
        QueryShape::OriginPullTiming | QueryShape::Timing => {
            let type_value = parsed
                .data
                .into_iter()
                .flat_map(|record| record.type_value)
                .find(|tv| tv.metric_name == metric)?;

            let points = type_value
                .detail
                .iter()
                .map(|p| (time_label(p.timestamp, offset), p.value.unwrap_or(0.0)));

            let series = match (type_value.sum, type_value.max, type_value.avg) {
                (Some(sum), Some(max), Some(avg)) => TimeSeries::from_points(points, sum, max, avg),
                _ => TimeSeries::from_values(points),
            };
            Some(MetricSample::Time(series))
        }
    }
}

/// Render an epoch-seconds timestamp as an axis label in the display zone.
pub fn time_label(timestamp: i64, offset: FixedOffset) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.with_timezone(&offset).format(TIME_LABEL_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
