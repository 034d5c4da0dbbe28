// Origin-pull panel and the derived cache hit rate
use super::series::LinePanel;
use crate::domain::catalog::{EDGE_RESPONSE_FLUX, ORIGIN_PULL, ORIGIN_RESPONSE_FLUX};
use crate::domain::chart::{ChartOption, ChartSurface, KpiUpdate};
use crate::domain::format::format_percent;
use crate::domain::metric::MetricResults;

pub const CACHE_HIT_RATE_KPI: &str = "kpi_cache_hit_rate";

pub fn update_origin_pull(surface: &mut ChartSurface, results: &MetricResults, kpis: &mut Vec<KpiUpdate>) {
    let panel = LinePanel::shared(&ORIGIN_PULL);
    kpis.extend(panel.kpis(results));
    surface.set_option(ChartOption::Line(panel.build(results)));

    kpis.push(KpiUpdate::new(CACHE_HIT_RATE_KPI, format_percent(cache_hit_rate(results))));
}

/// `1 - origin / edge` over the window's summed response volumes.
///
/// Zero when either side is missing or edge traffic is not positive. Not
/// clamped: a negative rate means the origin delivered more than the edge.
pub fn cache_hit_rate(results: &MetricResults) -> f64 {
    match (results.time(ORIGIN_RESPONSE_FLUX), results.time(EDGE_RESPONSE_FLUX)) {
        (Some(origin), Some(edge)) if edge.sum > 0.0 => 1.0 - origin.sum / edge.sum,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::panels::series::fixtures::results_with;

    #[test]
    fn test_hit_rate() {
        let results = results_with(vec![
            (ORIGIN_RESPONSE_FLUX, vec![100.0, 150.0]),
            (EDGE_RESPONSE_FLUX, vec![500.0, 500.0]),
        ]);
        assert_eq!(cache_hit_rate(&results), 0.75);
    }

    #[test]
    fn test_hit_rate_zero_edge_falls_back() {
        let results = results_with(vec![
            (ORIGIN_RESPONSE_FLUX, vec![100.0]),
            (EDGE_RESPONSE_FLUX, vec![0.0, 0.0]),
        ]);
        let rate = cache_hit_rate(&results);
        assert_eq!(rate, 0.0);
        assert!(rate.is_finite());
    }

    #[test]
    fn test_hit_rate_missing_side() {
        let results = results_with(vec![(EDGE_RESPONSE_FLUX, vec![10.0])]);
        assert_eq!(cache_hit_rate(&results), 0.0);
    }

    #[test]
    fn test_hit_rate_is_not_clamped() {
        let results = results_with(vec![
            (ORIGIN_RESPONSE_FLUX, vec![300.0]),
            (EDGE_RESPONSE_FLUX, vec![200.0]),
        ]);
        assert_eq!(cache_hit_rate(&results), -0.5);

        let mut surface = ChartSurface::default();
        let mut kpis = Vec::new();
        update_origin_pull(&mut surface, &results, &mut kpis);

        let hit = kpis.iter().find(|k| k.id == CACHE_HIT_RATE_KPI).unwrap();
        assert_eq!(hit.text, "-50.00%");
    }

    #[test]
    fn test_origin_pull_kpis_follow_class() {
        let results = results_with(vec![
            ("l7Flow_outBandwidth_hy", vec![1_000.0, 4_000.0]),
            ("l7Flow_request_hy", vec![3_000.0, 4_000.0]),
        ]);
        let mut surface = ChartSurface::default();
        let mut kpis = Vec::new();
        update_origin_pull(&mut surface, &results, &mut kpis);

        let text = |id: &str| kpis.iter().find(|k| k.id == id).map(|k| k.text.clone());
        assert_eq!(text("kpi_l7Flow_outBandwidth_hy").as_deref(), Some("4.00 Kbps"));
        assert_eq!(text("kpi_l7Flow_request_hy").as_deref(), Some("7,000"));
        assert_eq!(text(CACHE_HIT_RATE_KPI).as_deref(), Some("0.00%"));
    }
}
