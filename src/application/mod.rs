// Application layer - Use cases and the ports they depend on
pub mod dashboard_service;
pub mod metrics_repository;
pub mod settings_service;
pub mod settings_store;
pub mod traffic_service;
