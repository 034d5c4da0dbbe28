// Security panel - stacked interception counts with a window guard
use super::series::LinePanel;
use crate::domain::catalog::SECURITY;
use crate::domain::chart::{ChartOption, ChartSurface, KpiUpdate};
use crate::domain::format::format_count;
use crate::domain::metric::MetricResults;
use crate::domain::time_range::TimeWindow;

pub const SECURITY_KPI: &str = "kpi_security_hits";

const TOTAL_CAPTION: &str = "DDoS/CC 防护总拦截次数";
const RANGE_TOO_LARGE: &str = "范围过大";
const RANGE_CAPTION: &str = "仅支持查询14天内的数据";
const RANGE_PLACEHOLDER: &str = "该指标仅支持查询14天内的数据";

pub fn update_security(
    surface: &mut ChartSurface,
    results: &MetricResults,
    window: &TimeWindow,
    kpis: &mut Vec<KpiUpdate>,
) {
    if window.exceeds_security_limit() {
        kpis.push(KpiUpdate::new(SECURITY_KPI, RANGE_TOO_LARGE).with_caption(RANGE_CAPTION, true));
        surface.clear();
        surface.set_option(ChartOption::Placeholder {
            title: RANGE_PLACEHOLDER.to_string(),
        });
        return;
    }

    let panel = LinePanel::raw(&SECURITY)
        .area_opacity(Some(0.3))
        .stacked()
        .hide_axis_name();

    let total: f64 = panel.present(results).iter().map(|(_, series)| series.sum).sum();
    kpis.push(KpiUpdate::new(SECURITY_KPI, format_count(total)).with_caption(TOTAL_CAPTION, false));
    surface.set_option(ChartOption::Line(panel.build(results)));
}
