// Dashboard service - Use case for building dashboards
use crate::application::traffic_service::{MetricRequest, TrafficService};
use crate::domain::catalog::dashboard_metrics;
use crate::domain::chart::ChartBoard;
use crate::domain::dashboard::{render_dashboard, Dashboard};
use crate::domain::metric::{normalize, MetricResults};
use crate::domain::time_range::TimeWindow;
use chrono::FixedOffset;
use futures::stream::{self, StreamExt};
use std::time::Instant;

#[derive(Clone)]
pub struct DashboardService {
    traffic: TrafficService,
    concurrency: usize,
    offset: FixedOffset,
}

impl DashboardService {
    pub fn new(traffic: TrafficService, concurrency: usize, offset: FixedOffset) -> Self {
        Self {
            traffic,
            concurrency: concurrency.max(1),
            offset,
        }
    }

    pub async fn get_dashboard(&self, title: String, window: TimeWindow, interval: Option<&str>) -> Dashboard {
        let started = Instant::now();
        let (results, missing) = self.fetch_all(&window, interval).await;

        let mut board = ChartBoard::new();
        let kpis = render_dashboard(&results, &window, &mut board);

        tracing::info!(
            "Rendered dashboard with {} metrics ({} missing) in {:?}",
            results.len(),
            missing.len(),
            started.elapsed()
        );

        Dashboard::new(title, window, &board, kpis, missing)
    }

    /// Fetch every catalog metric; failures are logged and listed as missing.
    async fn fetch_all(&self, window: &TimeWindow, interval: Option<&str>) -> (MetricResults, Vec<String>) {
        let requests: Vec<MetricRequest> = dashboard_metrics()
            .into_iter()
            .map(|metric| MetricRequest::build(metric, window, interval))
            .collect();

        let fetched: Vec<_> = stream::iter(requests)
            .map(|request| async move {
                let outcome = self.traffic.send(&request).await;
                (request, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut results = MetricResults::new();
        let mut missing = Vec::new();

        for (request, outcome) in fetched {
            match outcome {
                Ok(payload) => match normalize(&request.metric, request.shape, &payload, self.offset) {
                    Some(sample) => results.insert(request.metric, sample),
                    None => {
                        tracing::debug!("No data for {}", request.metric);
                        missing.push(request.metric);
                    }
                },
                Err(e) => {
                    tracing::warn!("Error fetching {}: {:#}", request.metric, e);
                    missing.push(request.metric);
                }
            }
        }

        missing.sort();
        (results, missing)
    }
}
