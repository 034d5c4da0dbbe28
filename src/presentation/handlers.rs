// HTTP request handlers
use crate::application::traffic_service::DEFAULT_METRIC;
use crate::domain::dashboard::Dashboard;
use crate::domain::settings::DashboardConfig;
use crate::domain::time_range::TimeWindow;
use crate::presentation::app_state::AppState;
use crate::presentation::error::{internal_error, ApiError};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, ConnectInfo, FromRequestParts, Query, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficQuery {
    pub metric: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Caller address: first `X-Forwarded-For` entry, else the socket peer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientIp(pub String);

pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientIp(client_ip(&parts.headers, peer)))
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_config(ClientIp(ip): ClientIp, State(state): State<Arc<AppState>>) -> Json<DashboardConfig> {
    Json(state.settings_service.get_config(&ip).await)
}

pub async fn update_config(
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let body = match body {
        Ok(Json(body)) => Some(body),
        Err(rejection) => {
            tracing::debug!("Unreadable config body from {}: {}", ip, rejection);
            None
        }
    };

    let config = state
        .settings_service
        .update_config(&ip, authorization, body.as_ref())
        .await?;

    Ok(Json(json!({ "success": true, "config": config })))
}

/// A missing or unreadable body counts as a wrong password.
pub async fn login(
    ClientIp(ip): ClientIp,
    State(state): State<Arc<AppState>>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let token = match request {
        Ok(Json(request)) => state.settings_service.login(&ip, &request.password).await,
        Err(rejection) => {
            tracing::warn!("Rejected login body from {}: {}", ip, rejection);
            None
        }
    };

    match token {
        Some(token) => Json(json!({ "success": true, "token": token })).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "error": "Invalid password" })),
        )
            .into_response(),
    }
}

pub async fn logout(ClientIp(ip): ClientIp, State(state): State<Arc<AppState>>) -> Json<Value> {
    state.settings_service.logout(&ip).await;
    Json(json!({ "success": true }))
}

/// Proxy one metric query to the upstream API
pub async fn traffic(
    Query(query): Query<TrafficQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let window = TimeWindow::from_query(query.start_time.as_deref(), query.end_time.as_deref(), Utc::now())?;
    let metric = query
        .metric
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_METRIC);

    let response = state
        .traffic_service
        .fetch(metric, &window, query.interval.as_deref())
        .await
        .map_err(internal_error)?;

    Ok(Json(response))
}

/// Fetch every metric and return rendered charts and KPI tiles
pub async fn dashboard(
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, ApiError> {
    let window = TimeWindow::from_query(query.start_time.as_deref(), query.end_time.as_deref(), Utc::now())?;
    let title = state.settings_service.site_name().await;

    let dashboard = state
        .dashboard_service
        .get_dashboard(title, window, query.interval.as_deref())
        .await;

    Ok(Json(dashboard))
}
