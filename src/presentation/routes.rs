// Route table for the HTTP API
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{dashboard, get_config, health_check, login, logout, traffic, update_config};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// `/healthz` plus every API route under `/api`.
pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/config", get(get_config).post(update_config))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/traffic", get(traffic))
        .route("/dashboard", get(dashboard));

    Router::new()
        .route("/healthz", get(health_check))
        .nest("/api", api)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::metrics_repository::MetricsRepository;
    use crate::application::settings_service::fakes::MemoryStore;
    use crate::application::settings_service::SettingsService;
    use crate::application::traffic_service::fakes::FakeRepository;
    use crate::application::traffic_service::TrafficService;
    use crate::domain::settings::{admin_token, SiteDefaults, DEFAULT_SITE_NAME};
    use async_trait::async_trait;
    use chrono::FixedOffset;
    use reqwest::{header::CONTENT_TYPE, StatusCode};
    use serde_json::{json, Value};
    use std::net::SocketAddr;

    const PASSWORD: &str = "s3cret";

    struct NoCredentials;

    #[async_trait]
    impl MetricsRepository for NoCredentials {
        async fn query(&self, _action: &str, _payload: &Value) -> anyhow::Result<Value> {
            anyhow::bail!("Missing credentials")
        }
    }

    fn state(repository: Arc<dyn MetricsRepository>, store: Arc<MemoryStore>) -> Arc<AppState> {
        let traffic_service = TrafficService::new(repository);
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        Arc::new(AppState {
            dashboard_service: DashboardService::new(traffic_service.clone(), 2, offset),
            traffic_service,
            settings_service: SettingsService::new(store, PASSWORD.to_string(), SiteDefaults::default()),
        })
    }

    /// Serve the router on an ephemeral port; returns its base URL.
    async fn serve(state: Arc<AppState>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = app_router(state).into_make_service_with_connect_info::<SocketAddr>();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    async fn read(response: reqwest::Response) -> (StatusCode, Value) {
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn settings_app() -> (String, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let repository = Arc::new(NoCredentials);
        (serve(state(repository, store.clone())).await, store)
    }

    #[tokio::test]
    async fn test_health_check() {
        let (base, _) = settings_app().await;
        let response = client().get(format!("{base}/healthz")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_get_config_defaults() {
        let (base, _) = settings_app().await;
        let (status, body) = read(client().get(format!("{base}/api/config")).send().await.unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["siteName"], DEFAULT_SITE_NAME);
        assert_eq!(body["backgroundImage"], "");
        assert_eq!(body["useBackgroundImage"], true);
        assert_eq!(body["cardOpacity"], 1.0);
        assert_eq!(body["friendLinks"], json!([]));
        assert_eq!(body["isAuthorized"], false);
    }

    #[tokio::test]
    async fn test_update_config_checks_auth_before_body() {
        let (base, store) = settings_app().await;
        let url = format!("{base}/api/config");

        let (status, body) = read(client().post(&url).send().await.unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "Unauthorized"}));

        let response = client()
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body("{oops")
            .send()
            .await
            .unwrap();
        let (status, body) = read(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "Unauthorized"}));
        assert_eq!(*store.config_writes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_config_with_bearer() {
        let (base, store) = settings_app().await;
        let url = format!("{base}/api/config");
        let bearer = format!("Bearer {}", admin_token(PASSWORD));

        let response = client()
            .post(&url)
            .header("authorization", &bearer)
            .header(CONTENT_TYPE, "application/json")
            .body("{oops")
            .send()
            .await
            .unwrap();
        let (status, body) = read(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid request body"}));

        let response = client()
            .post(&url)
            .header("authorization", &bearer)
            .json(&json!({"cardOpacity": "1.5"}))
            .send()
            .await
            .unwrap();
        let (status, body) = read(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid cardOpacity format"}));
        assert_eq!(*store.config_writes.lock().unwrap(), 0);

        let response = client()
            .post(&url)
            .header("authorization", &bearer)
            .json(&json!({"cardOpacity": 0.4, "friendLinks": [{"name": "blog"}]}))
            .send()
            .await
            .unwrap();
        let (status, body) = read(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["config"]["cardOpacity"], 0.4);
        assert_eq!(body["config"]["friendLinks"][0]["name"], "blog");
        assert_eq!(*store.config_writes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_and_logout_round() {
        let (base, _) = settings_app().await;
        let login = format!("{base}/api/login");
        let config = format!("{base}/api/config");

        let (status, body) = read(client().post(&login).send().await.unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"success": false, "error": "Invalid password"}));

        let response = client().post(&login).json(&json!({"password": "nope"})).send().await.unwrap();
        assert_eq!(read(response).await.0, StatusCode::UNAUTHORIZED);

        let response = client().post(&login).json(&json!({"password": PASSWORD})).send().await.unwrap();
        let (status, body) = read(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "token": admin_token(PASSWORD)}));

        let (_, body) = read(client().get(&config).send().await.unwrap()).await;
        assert_eq!(body["isAuthorized"], true);

        // The allowlisted peer may update without a bearer token.
        let response = client().post(&config).json(&json!({"useBackgroundImage": false})).send().await.unwrap();
        let (status, body) = read(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["config"]["useBackgroundImage"], false);

        let (status, body) = read(client().post(format!("{base}/api/logout")).send().await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, body) = read(client().get(&config).send().await.unwrap()).await;
        assert_eq!(body["isAuthorized"], false);
    }

    #[tokio::test]
    async fn test_forwarded_for_decides_authorization() {
        let (base, _) = settings_app().await;
        let response = client()
            .post(format!("{base}/api/login"))
            .header("x-forwarded-for", "203.0.113.5, 10.0.0.1")
            .json(&json!({"password": PASSWORD}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (_, body) = read(client().get(format!("{base}/api/config")).send().await.unwrap()).await;
        assert_eq!(body["isAuthorized"], false);

        let response = client()
            .get(format!("{base}/api/config"))
            .header("x-forwarded-for", "203.0.113.5")
            .send()
            .await
            .unwrap();
        assert_eq!(read(response).await.1["isAuthorized"], true);
    }

    #[tokio::test]
    async fn test_traffic_without_credentials() {
        let (base, _) = settings_app().await;
        let (status, body) = read(client().get(format!("{base}/api/traffic")).send().await.unwrap()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Missing credentials"}));

        let response = client()
            .get(format!("{base}/api/traffic?startTime=yesterday"))
            .send()
            .await
            .unwrap();
        let (status, body) = read(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid startTime: yesterday"}));
    }

    #[tokio::test]
    async fn test_traffic_forwards_upstream_response() {
        let repository = Arc::new(FakeRepository::new(|_, _| json!({"Data": [], "RequestId": "req-1"})));
        let base = serve(state(repository.clone(), Arc::new(MemoryStore::default()))).await;

        let response = client()
            .get(format!("{base}/api/traffic?metric=l7Flow_request_country&interval=hour"))
            .send()
            .await
            .unwrap();
        let (status, body) = read(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"Data": [], "RequestId": "req-1"}));

        let calls = repository.calls.lock().unwrap();
        assert_eq!(calls[0].0, "DescribeTopL7AnalysisData");
        assert_eq!(calls[0].1["MetricName"], "l7Flow_request_country");
    }

    #[tokio::test]
    async fn test_dashboard_lists_metrics_without_data() {
        let repository = Arc::new(FakeRepository::new(|_, _| json!({"Data": []})));
        let base = serve(state(repository, Arc::new(MemoryStore::default()))).await;

        let response = client()
            .get(format!(
                "{base}/api/dashboard?startTime=2026-10-18T00:00:00Z&endTime=2026-10-19T00:00:00Z"
            ))
            .send()
            .await
            .unwrap();
        let (status, body) = read(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], DEFAULT_SITE_NAME);
        assert_eq!(body["startTime"], "2026-10-18T00:00:00Z");
        assert_eq!(body["endTime"], "2026-10-19T00:00:00Z");
        assert!(body["missing"].as_array().unwrap().iter().any(|m| *m == "l7Flow_flux"));
        assert!(body["kpis"].is_array());
        assert!(body["charts"].is_object());
    }
}
