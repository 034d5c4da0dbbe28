// World map of requests per country
use crate::domain::catalog::MAP_METRIC;
use crate::domain::chart::{ChartOption, ChartSurface, MapChart, MapRegion};
use crate::domain::format::format_locale;
use crate::domain::geo::{map_region_name, world_name_map};
use crate::domain::metric::{MetricResults, TopEntry};
use crate::domain::units::series_max;

const SERIES_NAME: &str = "请求数";

pub fn build_world_map(entries: &[TopEntry]) -> MapChart {
    let regions = entries
        .iter()
        .map(|entry| {
            let name = map_region_name(entry.key.trim());
            MapRegion {
                tooltip: format!("{name}\n{SERIES_NAME}: {} 次", format_locale(entry.value)),
                name,
                value: entry.value,
            }
        })
        .collect();

    let values: Vec<f64> = entries.iter().map(|e| e.value).collect();

    MapChart {
        series_name: SERIES_NAME.to_string(),
        visual_min: 0.0,
        visual_max: series_max(&values),
        name_map: world_name_map()
            .map(|(geometry, name)| (geometry.to_string(), name.to_string()))
            .collect(),
        regions,
    }
}

pub fn update_world_map(surface: &mut ChartSurface, results: &MetricResults) {
    if let Some(entries) = results.top(MAP_METRIC) {
        surface.set_option(ChartOption::Map(build_world_map(entries)));
    }
}
