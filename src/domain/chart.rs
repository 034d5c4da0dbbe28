// Chart-ready data handed to the rendering surface
use serde::Serialize;
use std::collections::BTreeMap;

/// Identifier of one chart on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChartId(&'static str);

impl ChartId {
    pub const TRAFFIC: ChartId = ChartId("traffic");
    pub const BANDWIDTH: ChartId = ChartId("bandwidth");
    pub const REQUESTS: ChartId = ChartId("requests");
    pub const PERFORMANCE: ChartId = ChartId("performance");
    pub const SECURITY: ChartId = ChartId("security");
    pub const ORIGIN_PULL: ChartId = ChartId("originPull");
    pub const FUNCTION_REQUESTS: ChartId = ChartId("functionRequests");
    pub const FUNCTION_CPU: ChartId = ChartId("functionCpu");
    pub const TOP_MAP: ChartId = ChartId("topMap");

    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub name: String,
    pub color: String,
    pub unit: String,
    pub display_values: Vec<f64>,
    /// Original values, kept for exact tooltips.
    pub raw_values: Vec<f64>,
    pub tooltips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChart {
    pub x_axis: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_name: Option<String>,
    pub legend: Vec<String>,
    pub stacked: bool,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarPoint {
    /// Axis label, possibly truncated.
    pub category: String,
    pub value: f64,
    pub raw_value: f64,
    pub tooltip: String,
}

/// Horizontal bar chart; points are ordered bottom to top.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    pub series_name: String,
    pub color: String,
    pub unit: String,
    pub points: Vec<BarPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRegion {
    pub name: String,
    pub value: f64,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapChart {
    pub series_name: String,
    pub visual_min: f64,
    pub visual_max: f64,
    pub name_map: BTreeMap<String, String>,
    pub regions: Vec<MapRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChartOption {
    Line(LineChart),
    Bar(BarChart),
    Map(MapChart),
    Placeholder { title: String },
}

/// Text update for one KPI tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiUpdate {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<KpiCaption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCaption {
    pub text: String,
    pub alert: bool,
}

impl KpiUpdate {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            caption: None,
        }
    }

    /// KPI id for a metric's tile.
    pub fn for_metric(metric: &str, text: impl Into<String>) -> Self {
        Self::new(format!("kpi_{metric}"), text)
    }

    pub fn with_caption(mut self, text: impl Into<String>, alert: bool) -> Self {
        self.caption = Some(KpiCaption {
            text: text.into(),
            alert,
        });
        self
    }
}

/// Owned rendering handle for one chart.
///
/// Each surface is mutated by exactly one section updater per refresh.
#[derive(Debug, Clone, Default)]
pub struct ChartSurface {
    option: Option<ChartOption>,
    revision: u64,
}

impl ChartSurface {
    pub fn set_option(&mut self, option: ChartOption) {
        self.option = Some(option);
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.option = None;
        self.revision += 1;
    }

    pub fn option(&self) -> Option<&ChartOption> {
        self.option.as_ref()
    }

    #[cfg(test)]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// All chart surfaces of a dashboard, keyed by chart id.
#[derive(Debug, Clone, Default)]
pub struct ChartBoard {
    surfaces: BTreeMap<ChartId, ChartSurface>,
}

impl ChartBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface_mut(&mut self, id: ChartId) -> &mut ChartSurface {
        self.surfaces.entry(id).or_default()
    }

    /// Current option of every surface that has one.
    pub fn snapshot(&self) -> BTreeMap<ChartId, ChartOption> {
        self.surfaces
            .iter()
            .filter_map(|(id, surface)| surface.option().map(|option| (*id, option.clone())))
            .collect()
    }
}
