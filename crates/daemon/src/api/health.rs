use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;

use roomwatch_engine::health::{SensorHealthStatus, SystemStatus};

use super::AppState;
use crate::scheduler::now_ms;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct SensorHealthResponse {
    pub sensors: BTreeMap<String, SensorHealthStatus>,
    pub system: SystemStatus,
}

pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

/// Ready once the evaluation loop has completed a tick.
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

pub async fn sensor_health(State(state): State<AppState>) -> Json<SensorHealthResponse> {
    let now = now_ms();
    Json(SensorHealthResponse {
        sensors: state.engine.health_status(now),
        system: state.engine.system_status(now),
    })
}
