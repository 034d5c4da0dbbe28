// Metric catalog - every metric the dashboard renders and how to query it
use super::chart::ChartId;
use super::units::QuantityClass;
use serde::Serialize;

/// Which aggregate a KPI tile shows for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiAggregate {
    Sum,
    Max,
    Avg,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDef {
    pub name: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub class: QuantityClass,
    pub kpi: KpiAggregate,
}

const fn metric(
    name: &'static str,
    label: &'static str,
    color: &'static str,
    class: QuantityClass,
    kpi: KpiAggregate,
) -> MetricDef {
    MetricDef {
        name,
        label,
        color,
        class,
        kpi,
    }
}

use KpiAggregate::{Avg, Max, Sum};
use QuantityClass::{Bandwidth, Bytes, Count, Duration};

pub const TRAFFIC: [MetricDef; 3] = [
    metric("l7Flow_outFlux", "EdgeOne 响应流量", "#3b82f6", Bytes, Sum),
    metric("l7Flow_inFlux", "客户端请求流量", "#10b981", Bytes, Sum),
    metric("l7Flow_flux", "总流量", "#8b5cf6", Bytes, Sum),
];

pub const BANDWIDTH: [MetricDef; 3] = [
    metric("l7Flow_outBandwidth", "EdgeOne 响应带宽", "#3b82f6", Bandwidth, Max),
    metric("l7Flow_inBandwidth", "客户端请求带宽", "#10b981", Bandwidth, Max),
    metric("l7Flow_bandwidth", "总带宽", "#8b5cf6", Bandwidth, Max),
];

pub const REQUESTS: [MetricDef; 1] = [metric("l7Flow_request", "请求数", "#f59e0b", Count, Sum)];

pub const PERFORMANCE: [MetricDef; 2] = [
    metric("l7Flow_avgResponseTime", "平均响应时间", "#06b6d4", Duration, Avg),
    metric("l7Flow_avgFirstByteResponseTime", "平均首字节响应时间", "#ec4899", Duration, Avg),
];

pub const ORIGIN_PULL: [MetricDef; 5] = [
    metric("l7Flow_outFlux_hy", "回源请求流量", "#3b82f6", Bytes, Sum),
    metric("l7Flow_outBandwidth_hy", "回源请求带宽", "#06b6d4", Bandwidth, Max),
    metric("l7Flow_request_hy", "回源请求数", "#f59e0b", Count, Sum),
    metric("l7Flow_inFlux_hy", "回源响应流量", "#10b981", Bytes, Sum),
    metric("l7Flow_inBandwidth_hy", "回源响应带宽", "#8b5cf6", Bandwidth, Max),
];

pub const SECURITY: [MetricDef; 3] = [
    metric("ccAcl_interceptNum", "精准防护拦截", "#ef4444", Count, Sum),
    metric("ccManage_interceptNum", "托管规则拦截", "#f59e0b", Count, Sum),
    metric("ccRate_interceptNum", "速率限制拦截", "#8b5cf6", Count, Sum),
];

pub const FUNCTION_REQUESTS: MetricDef =
    metric("function_requestCount", "边缘函数请求数", "#10b981", Count, Sum);
pub const FUNCTION_CPU: MetricDef =
    metric("function_cpuCostTime", "边缘函数 CPU 耗时", "#f59e0b", Duration, Sum);

/// Origin response volume; numerator of the cache hit rate.
pub const ORIGIN_RESPONSE_FLUX: &str = "l7Flow_inFlux_hy";
/// Edge response volume; denominator of the cache hit rate.
pub const EDGE_RESPONSE_FLUX: &str = "l7Flow_outFlux";

/// Metric feeding the world map.
pub const MAP_METRIC: &str = "l7Flow_request_country";

/// Display-name table applied to a top-N chart's keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLookup {
    Verbatim,
    Country,
    Province,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopChartDef {
    pub metric: &'static str,
    pub chart: ChartId,
    pub label: &'static str,
    pub color: &'static str,
    pub class: QuantityClass,
    pub lookup: KeyLookup,
    /// Axis labels longer than this are cut with `...`.
    pub axis_label_limit: usize,
    /// Tooltip names longer than this are cut; `None` shows them in full.
    pub tooltip_limit: Option<usize>,
}

const FLUX_LABEL: &str = "流量";
const REQUEST_LABEL: &str = "请求数";

const fn top(
    metric: &'static str,
    chart: &'static str,
    color: &'static str,
    lookup: KeyLookup,
) -> TopChartDef {
    let flux = is_flux_metric(metric);
    TopChartDef {
        metric,
        chart: ChartId::new(chart),
        label: if flux { FLUX_LABEL } else { REQUEST_LABEL },
        color,
        class: if flux { Bytes } else { Count },
        lookup,
        axis_label_limit: 20,
        tooltip_limit: Some(100),
    }
}

const fn referer(metric: &'static str, chart: &'static str, color: &'static str, axis_label_limit: usize) -> TopChartDef {
    let mut def = top(metric, chart, color, KeyLookup::Verbatim);
    def.axis_label_limit = axis_label_limit;
    def.tooltip_limit = None;
    def
}

const fn is_flux_metric(metric: &str) -> bool {
    let bytes = metric.as_bytes();
    let prefix = b"l7Flow_outFlux";
    if bytes.len() < prefix.len() {
        return false;
    }
    let mut i = 0;
    while i < prefix.len() {
        if bytes[i] != prefix[i] {
            return false;
        }
        i += 1;
    }
    true
}

const BLUE: &str = "#3b82f6";
const AMBER: &str = "#f59e0b";
const VIOLET: &str = "#8b5cf6";
const CYAN: &str = "#06b6d4";
const GREEN: &str = "#10b981";
const RED: &str = "#ef4444";
const PINK: &str = "#ec4899";

use KeyLookup::{Country, Province, Verbatim};

pub const TOP_CHARTS: [TopChartDef; 24] = [
    top("l7Flow_outFlux_country", "topCountry", BLUE, Country),
    top("l7Flow_outFlux_province", "topProvince", AMBER, Province),
    top("l7Flow_outFlux_statusCode", "topStatusCode", VIOLET, Verbatim),
    top("l7Flow_outFlux_domain", "topDomain", CYAN, Verbatim),
    top("l7Flow_outFlux_url", "topUrl", GREEN, Verbatim),
    top("l7Flow_outFlux_resourceType", "topResourceType", AMBER, Verbatim),
    top("l7Flow_outFlux_sip", "topSip", RED, Verbatim),
    referer("l7Flow_outFlux_referers", "topReferer", VIOLET, 30),
    top("l7Flow_outFlux_ua_device", "topUaDevice", CYAN, Verbatim),
    top("l7Flow_outFlux_ua_browser", "topUaBrowser", AMBER, Verbatim),
    top("l7Flow_outFlux_ua_os", "topUaOs", GREEN, Verbatim),
    top("l7Flow_outFlux_ua", "topUa", VIOLET, Verbatim),
    top("l7Flow_request_country", "topRequestCountry", BLUE, Country),
    top("l7Flow_request_province", "topRequestProvince", AMBER, Province),
    top("l7Flow_request_statusCode", "topRequestStatusCode", VIOLET, Verbatim),
    top("l7Flow_request_domain", "topRequestDomain", CYAN, Verbatim),
    top("l7Flow_request_url", "topRequestUrl", GREEN, Verbatim),
    top("l7Flow_request_resourceType", "topRequestResourceType", AMBER, Verbatim),
    top("l7Flow_request_sip", "topRequestSip", RED, Verbatim),
    referer("l7Flow_request_referers", "topRequestReferer", PINK, 50),
    top("l7Flow_request_ua_device", "topRequestUaDevice", CYAN, Verbatim),
    top("l7Flow_request_ua_browser", "topRequestUaBrowser", AMBER, Verbatim),
    top("l7Flow_request_ua_os", "topRequestUaOs", GREEN, Verbatim),
    top("l7Flow_request_ua", "topRequestUa", VIOLET, Verbatim),
];

/// The upstream API a metric is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QueryShape {
    TopAnalysis,
    OriginPullTiming,
    Timing,
}

impl QueryShape {
    pub fn classify(metric: &str) -> Self {
        if TOP_CHARTS.iter().any(|def| def.metric == metric) {
            QueryShape::TopAnalysis
        } else if ORIGIN_PULL.iter().any(|def| def.name == metric) {
            QueryShape::OriginPullTiming
        } else {
            QueryShape::Timing
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            QueryShape::TopAnalysis => "DescribeTopL7AnalysisData",
            QueryShape::OriginPullTiming => "DescribeTimingL7OriginPullData",
            QueryShape::Timing => "DescribeTimingL7AnalysisData",
        }
    }
}

/// Every time-series metric shown on the dashboard.
pub fn time_metrics() -> impl Iterator<Item = &'static MetricDef> {
    TRAFFIC
        .iter()
        .chain(BANDWIDTH.iter())
        .chain(REQUESTS.iter())
        .chain(PERFORMANCE.iter())
        .chain(ORIGIN_PULL.iter())
        .chain(SECURITY.iter())
        .chain([&FUNCTION_REQUESTS, &FUNCTION_CPU])
}

/// Every metric name one dashboard refresh needs, without duplicates.
pub fn dashboard_metrics() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = time_metrics()
        .map(|def| def.name)
        .chain(TOP_CHARTS.iter().map(|def| def.metric))
        .collect();
    let mut seen = std::collections::HashSet::new();
    names.retain(|name| seen.insert(*name));
    names
}
