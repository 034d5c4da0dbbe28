// Latency and edge-function panels
use super::series::{build_series, kpi_text, LinePanel};
use crate::domain::catalog::{MetricDef, FUNCTION_CPU, FUNCTION_REQUESTS, PERFORMANCE};
use crate::domain::chart::{ChartOption, ChartSurface, KpiUpdate, LineChart};
use crate::domain::metric::MetricResults;
use crate::domain::units::{select_unit, series_max};

/// Response-time panel; plotted raw in milliseconds, KPIs show the average.
pub fn update_performance(surface: &mut ChartSurface, results: &MetricResults, kpis: &mut Vec<KpiUpdate>) {
    let panel = LinePanel::raw(&PERFORMANCE);
    kpis.extend(panel.kpis(results));
    surface.set_option(ChartOption::Line(panel.build(results)));
}

// Edge functions get one chart per metric, each on its own scale.
pub fn update_function_requests(surface: &mut ChartSurface, results: &MetricResults, kpis: &mut Vec<KpiUpdate>) {
    render_single(&FUNCTION_REQUESTS, surface, results, kpis);
}

pub fn update_function_cpu(surface: &mut ChartSurface, results: &MetricResults, kpis: &mut Vec<KpiUpdate>) {
    render_single(&FUNCTION_CPU, surface, results, kpis);
}

fn render_single(def: &MetricDef, surface: &mut ChartSurface, results: &MetricResults, kpis: &mut Vec<KpiUpdate>) {
    let Some(data) = results.time(def.name) else {
        return;
    };

    kpis.push(KpiUpdate::for_metric(def.name, kpi_text(def, data)));

    let unit = select_unit(series_max(data.value_data()), def.class);
    surface.set_option(ChartOption::Line(LineChart {
        x_axis: data.time_data().to_vec(),
        y_axis_name: Some(unit.unit.to_string()),
        legend: vec![def.label.to_string()],
        stacked: false,
        series: vec![build_series(def, data, unit, Some(0.1))],
    }));
}
