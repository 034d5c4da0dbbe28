// Series builder for time-series panels
use crate::domain::catalog::{KpiAggregate, MetricDef};
use crate::domain::chart::{ChartSeries, KpiUpdate, LineChart};
use crate::domain::format::{format_duration_avg, format_locale, format_value};
use crate::domain::metric::{MetricResults, TimeSeries};
use crate::domain::units::{select_unit, series_max, QuantityClass, UnitSpec};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    /// One unit per quantity class, chosen from the panel-wide max.
    Shared,
    /// Values are plotted as received.
    Raw,
}

/// How a group of metrics is drawn on one line chart.
#[derive(Debug, Clone, Copy)]
pub struct LinePanel<'a> {
    pub metrics: &'a [MetricDef],
    pub scaling: Scaling,
    pub area_opacity: Option<f64>,
    pub stacked: bool,
    pub show_axis_name: bool,
}

impl<'a> LinePanel<'a> {
    pub fn shared(metrics: &'a [MetricDef]) -> Self {
        Self {
            metrics,
            scaling: Scaling::Shared,
            area_opacity: Some(0.1),
            stacked: false,
            show_axis_name: true,
        }
    }

    pub fn raw(metrics: &'a [MetricDef]) -> Self {
        Self {
            scaling: Scaling::Raw,
            area_opacity: None,
            ..Self::shared(metrics)
        }
    }

    pub fn area_opacity(mut self, opacity: Option<f64>) -> Self {
        self.area_opacity = opacity;
        self
    }

    pub fn stacked(mut self) -> Self {
        self.stacked = true;
        self
    }

    pub fn hide_axis_name(mut self) -> Self {
        self.show_axis_name = false;
        self
    }

    /// Metrics of this panel that are present as time series.
    pub fn present<'r>(&self, results: &'r MetricResults) -> Vec<(&'a MetricDef, &'r TimeSeries)> {
        self.metrics
            .iter()
            .filter_map(|def| results.time(def.name).map(|series| (def, series)))
            .collect()
    }

    /// Unit for each quantity class present in the panel.
    pub fn units(&self, results: &MetricResults) -> BTreeMap<QuantityClass, UnitSpec> {
        let mut class_max: BTreeMap<QuantityClass, f64> = BTreeMap::new();
        for (def, series) in self.present(results) {
            let max = class_max.entry(def.class).or_insert(0.0);
            *max = max.max(series_max(series.value_data()));
        }

        class_max
            .into_iter()
            .map(|(class, max)| {
                let unit = match self.scaling {
                    Scaling::Shared => select_unit(max, class),
                    Scaling::Raw => class.base_unit(),
                };
                (class, unit)
            })
            .collect()
    }

    pub fn build(&self, results: &MetricResults) -> LineChart {
        let units = self.units(results);
        let present = self.present(results);

        let x_axis = present
            .first()
            .map(|(_, series)| series.time_data().to_vec())
            .unwrap_or_default();

        let series = present
            .iter()
            .map(|(def, data)| {
                let unit = units
                    .get(&def.class)
                    .copied()
                    .unwrap_or_else(|| def.class.base_unit());
                build_series(def, data, unit, self.area_opacity)
            })
            .collect();

        let y_axis_name = match (self.show_axis_name, units.len()) {
            (true, 1) => units.values().next().map(|unit| unit.unit.to_string()),
            _ => None,
        };

        LineChart {
            x_axis,
            y_axis_name,
            legend: self.metrics.iter().map(|def| def.label.to_string()).collect(),
            stacked: self.stacked,
            series,
        }
    }

    /// KPI tiles for every present metric, from un-scaled aggregates.
    pub fn kpis(&self, results: &MetricResults) -> Vec<KpiUpdate> {
        self.present(results)
            .into_iter()
            .map(|(def, series)| KpiUpdate::for_metric(def.name, kpi_text(def, series)))
            .collect()
    }
}

pub fn build_series(def: &MetricDef, data: &TimeSeries, unit: UnitSpec, area_opacity: Option<f64>) -> ChartSeries {
    let raw_values = data.value_data().to_vec();
    ChartSeries {
        name: def.label.to_string(),
        color: def.color.to_string(),
        unit: unit.unit.to_string(),
        display_values: raw_values.iter().map(|v| unit.scale(*v)).collect(),
        tooltips: raw_values
            .iter()
            .map(|v| format!("{}: {}", def.label, tooltip_value(*v, def.class)))
            .collect(),
        raw_values,
        area_opacity,
    }
}

pub fn tooltip_value(value: f64, class: QuantityClass) -> String {
    match class {
        QuantityClass::Duration => format!("{} ms", format_locale(value)),
        _ => format_value(value, class),
    }
}

/// KPI text for a metric's declared aggregate.
pub fn kpi_text(def: &MetricDef, series: &TimeSeries) -> String {
    let value = match def.kpi {
        KpiAggregate::Sum => series.sum,
        KpiAggregate::Max => series.max,
        KpiAggregate::Avg => series.avg,
    };
    match (def.class, def.kpi) {
        (QuantityClass::Duration, KpiAggregate::Avg) => format_duration_avg(value),
        (class, _) => format_value(value, class),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{self, results_with};
    use super::*;
    use crate::domain::catalog::{ORIGIN_PULL, PERFORMANCE, TRAFFIC};

    #[test]
    fn test_shared_scale_across_panel() {
        let results = results_with(vec![
            ("l7Flow_outFlux", vec![1e9, 2e9]),
            ("l7Flow_inFlux", vec![1024.0, 2048.0]),
        ]);
        let chart = LinePanel::shared(&TRAFFIC).build(&results);

        assert_eq!(chart.y_axis_name.as_deref(), Some("GB"));
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].display_values, vec![0.93, 1.86]);
        assert_eq!(chart.series[0].raw_values, vec![1e9, 2e9]);
        assert_eq!(chart.series[1].unit, "GB");
        assert_eq!(chart.x_axis.len(), 2);
        assert_eq!(chart.legend.len(), 3);
    }

    #[test]
    fn test_missing_and_mismatched_metrics_are_skipped() {
        let mut results = results_with(vec![("l7Flow_flux", vec![5.0])]);
        results.insert("l7Flow_outFlux", fixtures::top_sample(&[("CN", 1.0)]));

        let chart = LinePanel::shared(&TRAFFIC).build(&results);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, "总流量");
    }

    #[test]
    fn test_empty_panel_renders_empty_chart() {
        let chart = LinePanel::shared(&TRAFFIC).build(&MetricResults::new());
        assert!(chart.series.is_empty());
        assert!(chart.x_axis.is_empty());
        assert_eq!(chart.y_axis_name, None);
    }

    #[test]
    fn test_mixed_classes_scale_independently() {
        let results = results_with(vec![
            ("l7Flow_outFlux_hy", vec![3.0 * 1024.0 * 1024.0]),
            ("l7Flow_outBandwidth_hy", vec![5_000_000.0]),
            ("l7Flow_request_hy", vec![20_000.0]),
        ]);
        let panel = LinePanel::shared(&ORIGIN_PULL);
        let units = panel.units(&results);
        assert_eq!(units[&QuantityClass::Bytes].unit, "MB");
        assert_eq!(units[&QuantityClass::Bandwidth].unit, "Mbps");
        assert_eq!(units[&QuantityClass::Count].unit, "万");

        let chart = panel.build(&results);
        assert_eq!(chart.y_axis_name, None);
        assert_eq!(chart.series[2].display_values, vec![2.0]);
        assert_eq!(chart.series[2].tooltips[0], "回源请求数: 2.00 万");
    }

    #[test]
    fn test_raw_panel_keeps_values() {
        let results = results_with(vec![("l7Flow_avgResponseTime", vec![120.5, 80.3])]);
        let panel = LinePanel::raw(&PERFORMANCE);
        let chart = panel.build(&results);
        assert_eq!(chart.series[0].display_values, vec![120.5, 80.3]);
        assert_eq!(chart.y_axis_name.as_deref(), Some("ms"));

        let kpis = panel.kpis(&results);
        assert_eq!(kpis[0].id, "kpi_l7Flow_avgResponseTime");
        assert_eq!(kpis[0].text, "100.40 ms");
    }
}
