// Domain layer - Metric model, formatting and chart rendering
pub mod catalog;
pub mod chart;
pub mod dashboard;
pub mod format;
pub mod geo;
pub mod metric;
pub mod panels;
pub mod settings;
pub mod time_range;
pub mod units;
