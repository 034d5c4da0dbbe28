// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod credentials;
pub mod json_store;
pub mod logging;
pub mod teo_client;
