// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::application::dashboard_service::DashboardService;
use crate::application::settings_service::SettingsService;
use crate::application::traffic_service::TrafficService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::json_store::JsonFileStore;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::teo_client::TeoClient;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::app_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();
    init_logging();

    let config = load_app_config()?;
    let offset = config.display_offset()?;

    // Create adapters (infrastructure layer)
    let repository = Arc::new(TeoClient::new(&config.teo)?);
    let store = Arc::new(JsonFileStore::new(
        &config.storage.config_file,
        &config.storage.auth_file,
    ));

    // Create services (application layer)
    let traffic_service = TrafficService::new(repository);
    let dashboard_service =
        DashboardService::new(traffic_service.clone(), config.dashboard.fetch_concurrency, offset);
    let settings_service = SettingsService::new(
        store,
        config.dashboard.admin_password.clone(),
        config.site_defaults(),
    );

    let state = Arc::new(AppState {
        traffic_service,
        dashboard_service,
        settings_service,
    });

    // Build router (presentation layer)
    let mut router = app_router(state);

    if let Some(dir) = &config.server.static_dir {
        tracing::info!("Serving static files from {}", dir);
        router = router.fallback_service(ServeDir::new(dir));
    }

    let router = router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind))?;
    tracing::info!("Starting edge-monitor on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
