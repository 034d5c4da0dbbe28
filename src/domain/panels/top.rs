// Top-N breakdown panels
use crate::domain::catalog::{KeyLookup, TopChartDef};
use crate::domain::chart::{BarChart, BarPoint, ChartOption, ChartSurface};
use crate::domain::format::{format_bytes, format_count, with_occurrences};
use crate::domain::geo::{country_name, province_name};
use crate::domain::metric::{MetricResults, TopEntry};
use crate::domain::units::{select_unit, QuantityClass};

/// Bars shown per chart.
pub const TOP_LIMIT: usize = 10;

/// Label used for empty or placeholder keys.
pub const MISSING_FIELD: &str = "字段不存在";

/// Strip backticks and whitespace; empty and `-` keys become [`MISSING_FIELD`].
pub fn normalize_key(raw: &str) -> Option<String> {
    let cleaned = raw.replace('`', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "-" {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Display name for a top entry's key.
pub fn display_name(raw: &str, lookup: KeyLookup) -> String {
    let Some(key) = normalize_key(raw) else {
        return MISSING_FIELD.to_string();
    };
    let resolved = match lookup {
        KeyLookup::Verbatim => None,
        KeyLookup::Country => country_name(&key),
        KeyLookup::Province => province_name(&key),
    };
    resolved.map(str::to_string).unwrap_or(key)
}

/// The `limit` highest entries, largest first.
pub fn top_entries(entries: &[TopEntry], limit: usize) -> Vec<&TopEntry> {
    let mut sorted: Vec<&TopEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
    sorted.truncate(limit);
    sorted
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn tooltip_value(value: f64, class: QuantityClass) -> String {
    match class {
        QuantityClass::Bytes => format_bytes(value),
        _ => with_occurrences(format_count(value)),
    }
}

pub fn build_top_chart(def: &TopChartDef, entries: &[TopEntry]) -> BarChart {
    let sorted = top_entries(entries, TOP_LIMIT);
    let unit = select_unit(sorted.first().map(|e| e.value).unwrap_or(0.0), def.class);

    // Rendered bottom to top, so the largest bar goes last.
    let points = sorted
        .iter()
        .rev()
        .map(|entry| {
            let name = display_name(&entry.key, def.lookup);
            let tooltip_name = match def.tooltip_limit {
                Some(limit) => truncate_chars(&name, limit),
                None => name.clone(),
            };
            BarPoint {
                category: truncate_chars(&name, def.axis_label_limit),
                value: unit.scale(entry.value),
                raw_value: entry.value,
                tooltip: format!("{tooltip_name}\n{}: {}", def.label, tooltip_value(entry.value, def.class)),
            }
        })
        .collect();

    BarChart {
        series_name: def.label.to_string(),
        color: def.color.to_string(),
        unit: unit.unit.to_string(),
        points,
    }
}

/// Leaves the surface untouched when the metric is absent or not a top sample.
pub fn update_top_chart(surface: &mut ChartSurface, def: &TopChartDef, results: &MetricResults) {
    if let Some(entries) = results.top(def.metric) {
        surface.set_option(ChartOption::Bar(build_top_chart(def, entries)));
    }
}
