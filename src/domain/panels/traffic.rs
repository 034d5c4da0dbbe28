// Traffic, bandwidth and request panels
use super::series::LinePanel;
use crate::domain::catalog::{BANDWIDTH, REQUESTS, TRAFFIC};
use crate::domain::chart::{ChartOption, ChartSurface, KpiUpdate};
use crate::domain::metric::MetricResults;

/// Volume panel; KPIs show the summed bytes.
pub fn update_traffic(surface: &mut ChartSurface, results: &MetricResults, kpis: &mut Vec<KpiUpdate>) {
    render(LinePanel::shared(&TRAFFIC), surface, results, kpis);
}

/// Bandwidth panel; KPIs show the peak rate.
pub fn update_bandwidth(surface: &mut ChartSurface, results: &MetricResults, kpis: &mut Vec<KpiUpdate>) {
    render(LinePanel::shared(&BANDWIDTH), surface, results, kpis);
}

pub fn update_requests(surface: &mut ChartSurface, results: &MetricResults, kpis: &mut Vec<KpiUpdate>) {
    let panel = LinePanel::shared(&REQUESTS).area_opacity(Some(0.2));
    render(panel, surface, results, kpis);
}

fn render(panel: LinePanel<'_>, surface: &mut ChartSurface, results: &MetricResults, kpis: &mut Vec<KpiUpdate>) {
    kpis.extend(panel.kpis(results));
    surface.set_option(ChartOption::Line(panel.build(results)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::panels::series::fixtures::results_with;

    fn line(surface: &ChartSurface) -> &crate::domain::chart::LineChart {
        match surface.option() {
            Some(ChartOption::Line(chart)) => chart,
            other => panic!("expected line chart, got {other:?}"),
        }
    }

    #[test]
    fn test_requests_below_count_threshold() {
        let results = results_with(vec![("l7Flow_request", vec![1000.0, 2000.0, 3000.0])]);
        let mut surface = ChartSurface::default();
        let mut kpis = Vec::new();

        update_requests(&mut surface, &results, &mut kpis);

        let chart = line(&surface);
        assert_eq!(chart.series[0].display_values, vec![1000.0, 2000.0, 3000.0]);
        assert_eq!(chart.y_axis_name.as_deref(), Some("次"));
        assert_eq!(chart.series[0].area_opacity, Some(0.2));
        assert_eq!(kpis, vec![KpiUpdate::for_metric("l7Flow_request", "6,000")]);
    }

    #[test]
    fn test_traffic_kpi_uses_sum() {
        let results = results_with(vec![("l7Flow_outFlux", vec![1e9, 2e9])]);
        let mut surface = ChartSurface::default();
        let mut kpis = Vec::new();

        update_traffic(&mut surface, &results, &mut kpis);

        let chart = line(&surface);
        assert_eq!(chart.y_axis_name.as_deref(), Some("GB"));
        assert_eq!(chart.series[0].display_values, vec![0.93, 1.86]);
        assert_eq!(chart.series[0].tooltips[1], "EdgeOne 响应流量: 1.86 GB");
        assert_eq!(kpis[0].text, "2.79 GB");
    }

    #[test]
    fn test_bandwidth_kpi_uses_peak() {
        let results = results_with(vec![("l7Flow_bandwidth", vec![2_000_000.0, 8_500_000.0])]);
        let mut surface = ChartSurface::default();
        let mut kpis = Vec::new();

        update_bandwidth(&mut surface, &results, &mut kpis);

        assert_eq!(line(&surface).y_axis_name.as_deref(), Some("Mbps"));
        assert_eq!(kpis[0].id, "kpi_l7Flow_bandwidth");
        assert_eq!(kpis[0].text, "8.50 Mbps");
    }
}
