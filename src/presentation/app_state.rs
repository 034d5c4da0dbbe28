// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::settings_service::SettingsService;
use crate::application::traffic_service::TrafficService;

#[derive(Clone)]
pub struct AppState {
    pub traffic_service: TrafficService,
    pub dashboard_service: DashboardService,
    pub settings_service: SettingsService,
}
