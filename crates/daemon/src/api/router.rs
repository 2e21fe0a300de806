use axum::routing::{get, put};
use axum::Router;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::net::TcpListener;

use roomwatch_engine::Engine;

use super::{alerts, health, metrics, readings, rules};
use crate::sensor::SensorHub;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub hub: SensorHub,
    pub ready: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(engine: Engine, hub: SensorHub) -> Self {
        Self {
            engine,
            hub,
            ready: Arc::new(AtomicBool::new(false)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::metrics))
        .route("/v1/health", get(health::sensor_health))
        .route("/v1/alerts", get(alerts::list_alerts))
        .route("/v1/alerts/summary", get(alerts::summary))
        .route("/v1/alerts/export", get(alerts::export))
        .route("/v1/rules", get(rules::list_rules))
        .route("/v1/rules/{alert_type}", put(rules::update_rule))
        .route(
            "/v1/readings",
            get(readings::latest_readings).post(readings::push_reading),
        )
        .route("/v1/readings/{sensor_type}", get(readings::latest_reading))
        .with_state(state)
}

pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
