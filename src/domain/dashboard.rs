// Dashboard domain model
use super::catalog::TOP_CHARTS;
use super::chart::{ChartBoard, ChartId, ChartOption, KpiUpdate};
use super::metric::MetricResults;
use super::panels::{origin_pull, performance, security, top, traffic, world_map};
use super::time_range::TimeWindow;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    #[serde(flatten)]
    pub window: TimeWindow,
    pub kpis: Vec<KpiUpdate>,
    pub charts: BTreeMap<ChartId, ChartOption>,
    /// Metrics that failed or came back without data for this refresh.
    pub missing: Vec<String>,
}

impl Dashboard {
    pub fn new(title: String, window: TimeWindow, board: &ChartBoard, kpis: Vec<KpiUpdate>, missing: Vec<String>) -> Self {
        Self {
            title,
            window,
            kpis,
            charts: board.snapshot(),
            missing,
        }
    }
}

/// Run every section updater against one set of results.
///
/// Each updater is handed only the surface it owns.
pub fn render_dashboard(results: &MetricResults, window: &TimeWindow, board: &mut ChartBoard) -> Vec<KpiUpdate> {
    let mut kpis = Vec::new();

    traffic::update_traffic(board.surface_mut(ChartId::TRAFFIC), results, &mut kpis);
    traffic::update_bandwidth(board.surface_mut(ChartId::BANDWIDTH), results, &mut kpis);
    traffic::update_requests(board.surface_mut(ChartId::REQUESTS), results, &mut kpis);
    origin_pull::update_origin_pull(board.surface_mut(ChartId::ORIGIN_PULL), results, &mut kpis);
    performance::update_performance(board.surface_mut(ChartId::PERFORMANCE), results, &mut kpis);
    security::update_security(board.surface_mut(ChartId::SECURITY), results, window, &mut kpis);

    performance::update_function_requests(board.surface_mut(ChartId::FUNCTION_REQUESTS), results, &mut kpis);
    performance::update_function_cpu(board.surface_mut(ChartId::FUNCTION_CPU), results, &mut kpis);

    for def in &TOP_CHARTS {
        top::update_top_chart(board.surface_mut(def.chart), def, results);
    }
    world_map::update_world_map(board.surface_mut(ChartId::TOP_MAP), results);

    kpis
}
